use axum::extract::multipart::{Field, Multipart, MultipartError};
use garde::Validate;
use http::StatusCode;
use mreview_dal::movie::Movie;
use mreview_types::poster::{check_extension, check_size, PosterRejection};
use serde::Serialize;
use tracing::{debug, warn};

/// Raw values of the movie form, kept as submitted so they can be shown again
#[derive(Debug, Default, Clone, Serialize)]
pub struct MovieFields {
    pub id: Option<String>,
    pub version: Option<String>,
    pub title: String,
    pub year: String,
    pub rate: String,
    pub synopsis: String,
    pub genre_id: String,
}

impl From<&Movie> for MovieFields {
    fn from(movie: &Movie) -> Self {
        MovieFields {
            id: Some(movie.id.to_string()),
            version: Some(movie.version.to_string()),
            title: movie.title.clone(),
            year: movie.year.to_string(),
            rate: movie.rate.to_string(),
            synopsis: movie.synopsis.clone(),
            genre_id: movie.genre.id.to_string(),
        }
    }
}

impl MovieFields {
    pub fn id(&self) -> Option<i64> {
        self.id.as_deref().and_then(|id| id.trim().parse().ok())
    }

    pub fn version(&self) -> Option<i64> {
        self.version.as_deref().and_then(|v| v.trim().parse().ok())
    }

    pub fn selected_genre(&self) -> Option<i64> {
        self.genre_id.trim().parse().ok()
    }
}

/// Validation messages per form field
#[derive(Debug, Default, Clone, Serialize)]
pub struct FieldErrors {
    pub title: Vec<String>,
    pub year: Vec<String>,
    pub rate: Vec<String>,
    pub synopsis: Vec<String>,
    pub genre_id: Vec<String>,
    pub poster: Vec<String>,
}

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl ToString) {
        let messages = match field {
            "title" => &mut self.title,
            "year" => &mut self.year,
            "rate" => &mut self.rate,
            "synopsis" => &mut self.synopsis,
            "genre_id" => &mut self.genre_id,
            "poster" => &mut self.poster,
            other => {
                warn!("Validation error for unknown field {other}");
                return;
            }
        };
        messages.push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.year.is_empty()
            && self.rate.is_empty()
            && self.synopsis.is_empty()
            && self.genre_id.is_empty()
            && self.poster.is_empty()
    }

    fn add_report(&mut self, report: garde::Report) {
        for (path, error) in report.iter() {
            self.add(&path.to_string(), error.message());
        }
    }
}

#[derive(Debug, Validate)]
struct MovieInput {
    #[garde(length(chars, min = 1, max = 250))]
    title: String,
    #[garde(skip)]
    year: i64,
    #[garde(range(min = 1.0, max = 10.0))]
    rate: f64,
    #[garde(length(chars, min = 1, max = 2500))]
    synopsis: String,
    #[garde(range(min = 1))]
    genre_id: i64,
}

#[derive(Debug)]
pub struct PosterUpload {
    pub file_name: String,
    /// Uploaded bytes, reading stops once the size limit is exceeded
    pub data: Vec<u8>,
    /// Request body limit was reached before the whole file arrived
    pub over_limit: bool,
}

impl PosterUpload {
    pub fn check(self, max_size: usize) -> Result<Vec<u8>, PosterRejection> {
        check_extension(&self.file_name)?;
        if self.over_limit {
            return Err(PosterRejection::TooLarge { max: max_size });
        }
        check_size(self.data.len(), max_size)?;
        Ok(self.data)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PosterPolicy {
    pub required: bool,
    pub max_size: usize,
}

/// Movie values that passed all checks
#[derive(Debug)]
pub struct ValidMovie {
    pub title: String,
    pub year: i64,
    pub rate: f64,
    pub synopsis: String,
    pub genre_id: i64,
    pub poster: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
pub struct MovieSubmission {
    pub fields: MovieFields,
    pub poster: Option<PosterUpload>,
}

fn over_body_limit(error: &MultipartError) -> bool {
    error.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// Reads at most a chunk past `max_size`, the flag tells if the body limit cut the file short
async fn read_capped(
    field: &mut Field<'_>,
    max_size: usize,
) -> Result<(Vec<u8>, bool), MultipartError> {
    let mut data = Vec::new();
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                data.extend_from_slice(&chunk);
                if data.len() > max_size {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) if over_body_limit(&e) => {
                debug!("Body limit reached after {} poster bytes", data.len());
                return Ok((data, true));
            }
            Err(e) => return Err(e),
        }
    }
    Ok((data, false))
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    field: &str,
    required_msg: &str,
    invalid_msg: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, required_msg);
        return None;
    }
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(field, invalid_msg);
            None
        }
    }
}

impl MovieSubmission {
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_poster_size: usize,
    ) -> Result<Self, MultipartError> {
        let mut submission = MovieSubmission::default();
        let mut skipping_poster = false;
        loop {
            let mut field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                // rest of a capped poster does not fit into the body limit
                Err(e) if skipping_poster && over_body_limit(&e) => {
                    debug!("Body limit reached while skipping poster: {e}");
                    if let Some(poster) = submission.poster.as_mut() {
                        poster.over_limit = true;
                    }
                    break;
                }
                Err(e) => return Err(e),
            };
            skipping_poster = false;
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "poster" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let (data, over_limit) = read_capped(&mut field, max_poster_size).await?;
                    if data.is_empty() && !over_limit {
                        debug!("Empty poster field, file name {file_name:?}");
                        continue;
                    }
                    skipping_poster = data.len() > max_poster_size;
                    match submission.poster.as_mut() {
                        None => {
                            submission.poster = Some(PosterUpload {
                                file_name,
                                data,
                                over_limit,
                            })
                        }
                        Some(poster) => poster.over_limit |= over_limit,
                    }
                    if over_limit {
                        break;
                    }
                }
                "id" => submission.fields.id = Some(field.text().await?),
                "version" => submission.fields.version = Some(field.text().await?),
                "title" => submission.fields.title = field.text().await?,
                "year" => submission.fields.year = field.text().await?,
                "rate" => submission.fields.rate = field.text().await?,
                "synopsis" => submission.fields.synopsis = field.text().await?,
                "genre_id" => submission.fields.genre_id = field.text().await?,
                other => debug!("Ignoring unknown form field {other}"),
            }
        }
        Ok(submission)
    }

    /// Checks poster and all fields, collecting every problem found.
    ///
    /// `genre_exists` tells whether the selected genre is in the catalog.
    /// The poster is taken out of the submission, so it is validated only once.
    pub fn validate(
        &mut self,
        policy: PosterPolicy,
        genre_exists: bool,
    ) -> Result<ValidMovie, FieldErrors> {
        let mut errors = FieldErrors::default();

        let poster = match self.poster.take() {
            None if policy.required => {
                errors.add("poster", PosterRejection::Missing);
                None
            }
            None => None,
            Some(upload) => match upload.check(policy.max_size) {
                Ok(data) => Some(data),
                Err(rejection) => {
                    errors.add("poster", rejection);
                    None
                }
            },
        };

        let fields = &self.fields;
        let year = parse_number::<i64>(
            &fields.year,
            "year",
            "The Year field is required.",
            "Year must be a whole number.",
            &mut errors,
        );
        let rate = parse_number::<f64>(
            &fields.rate,
            "rate",
            "The Rate field is required.",
            "Rate must be a number.",
            &mut errors,
        )
        .filter(|rate| {
            let finite = rate.is_finite();
            if !finite {
                errors.add("rate", "Rate must be a number.");
            }
            finite
        });
        let genre_id = parse_number::<i64>(
            &fields.genre_id,
            "genre_id",
            "Please select a genre.",
            "Unknown genre.",
            &mut errors,
        );

        // placeholders are valid values, so parse failures are not reported twice
        let input = MovieInput {
            title: fields.title.trim().to_string(),
            year: year.unwrap_or_default(),
            rate: rate.unwrap_or(1.0),
            synopsis: fields.synopsis.trim().to_string(),
            genre_id: genre_id.unwrap_or(1),
        };
        if let Err(report) = input.validate() {
            errors.add_report(report);
        }

        if genre_id.is_some() && !genre_exists {
            errors.add("genre_id", "Unknown genre.");
        }

        if errors.is_empty() {
            Ok(ValidMovie {
                title: input.title,
                year: input.year,
                rate: input.rate,
                synopsis: input.synopsis,
                genre_id: input.genre_id,
                poster,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest as _};
    use mreview_dal::genre::Genre;
    use http::{header::CONTENT_TYPE, Request};
    use tracing_test::traced_test;

    const MAX: usize = 1024 * 1024;

    fn inception(poster: Option<PosterUpload>) -> MovieSubmission {
        MovieSubmission {
            fields: MovieFields {
                id: None,
                version: None,
                title: "Inception".into(),
                year: "2010".into(),
                rate: "9".into(),
                synopsis: "A thief who steals secrets...".into(),
                genre_id: "1".into(),
            },
            poster,
        }
    }

    fn jpg(size: usize) -> Option<PosterUpload> {
        Some(PosterUpload {
            file_name: "inception.jpg".into(),
            data: vec![7; size],
            over_limit: false,
        })
    }

    const CREATE: PosterPolicy = PosterPolicy {
        required: true,
        max_size: MAX,
    };
    const EDIT: PosterPolicy = PosterPolicy {
        required: false,
        max_size: MAX,
    };

    #[test]
    fn test_valid_create() {
        let mut submission = inception(jpg(500_000));
        let movie = submission.validate(CREATE, true).unwrap();
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.year, 2010);
        assert_eq!(movie.rate, 9.0);
        assert_eq!(movie.genre_id, 1);
        assert_eq!(movie.poster.unwrap().len(), 500_000);
        assert!(submission.poster.is_none());
    }

    #[test]
    fn test_poster_required_on_create() {
        let errors = inception(None).validate(CREATE, true).unwrap_err();
        assert_eq!(errors.poster, vec![PosterRejection::Missing.to_string()]);
        assert!(errors.title.is_empty());
    }

    #[test]
    fn test_poster_optional_on_edit() {
        let movie = inception(None).validate(EDIT, true).unwrap();
        assert!(movie.poster.is_none());
    }

    #[test]
    fn test_unsupported_poster_type() {
        let poster = Some(PosterUpload {
            file_name: "poster.gif".into(),
            data: vec![1; 10],
            over_limit: false,
        });
        let errors = inception(poster).validate(CREATE, true).unwrap_err();
        assert_eq!(
            errors.poster,
            vec![PosterRejection::UnsupportedType.to_string()]
        );

        let poster = Some(PosterUpload {
            file_name: "poster.gif".into(),
            data: vec![1; 10],
            over_limit: false,
        });
        assert!(inception(poster).validate(EDIT, true).is_err());
    }

    #[test]
    fn test_poster_too_large() {
        let errors = inception(jpg(MAX + 1))
            .validate(EDIT, true)
            .unwrap_err();
        assert_eq!(
            errors.poster,
            vec![PosterRejection::TooLarge { max: MAX }.to_string()]
        );
        assert!(inception(jpg(MAX)).validate(CREATE, true).is_ok());
    }

    #[test]
    fn test_extension_checked_before_size() {
        let poster = Some(PosterUpload {
            file_name: "huge.bmp".into(),
            data: vec![1; MAX + 1],
            over_limit: false,
        });
        let errors = inception(poster).validate(CREATE, true).unwrap_err();
        assert_eq!(
            errors.poster,
            vec![PosterRejection::UnsupportedType.to_string()]
        );
    }

    #[test]
    fn test_field_validation() {
        let mut submission = inception(jpg(10));
        submission.fields.title = "   ".into();
        submission.fields.year = "twenty ten".into();
        submission.fields.rate = "11".into();
        submission.fields.synopsis = "x".repeat(2501);
        let errors = submission.validate(CREATE, true).unwrap_err();
        assert_eq!(errors.title.len(), 1);
        assert_eq!(errors.year, vec!["Year must be a whole number.".to_string()]);
        assert_eq!(errors.rate.len(), 1);
        assert_eq!(errors.synopsis.len(), 1);
        assert!(errors.genre_id.is_empty());
        assert!(errors.poster.is_empty());
    }

    #[test]
    fn test_rate_bounds() {
        for (rate, ok) in [("1", true), ("10", true), ("0.9", false), ("NaN", false), ("", false)] {
            let mut submission = inception(jpg(10));
            submission.fields.rate = rate.into();
            assert_eq!(
                submission.validate(CREATE, true).is_ok(),
                ok,
                "rate {rate}"
            );
        }
    }

    #[test]
    fn test_unknown_genre() {
        let mut submission = inception(jpg(10));
        submission.fields.genre_id = "42".into();
        let errors = submission.validate(CREATE, false).unwrap_err();
        assert_eq!(errors.genre_id, vec!["Unknown genre.".to_string()]);

        let mut submission = inception(jpg(10));
        submission.fields.genre_id = "".into();
        let errors = submission.validate(CREATE, false).unwrap_err();
        assert_eq!(errors.genre_id, vec!["Please select a genre.".to_string()]);

        let mut submission = inception(jpg(10));
        submission.fields.genre_id = "abc".into();
        let errors = submission.validate(CREATE, false).unwrap_err();
        assert_eq!(errors.genre_id, vec!["Unknown genre.".to_string()]);
    }

    #[test]
    fn test_fields_from_movie() {
        let movie = Movie {
            id: 5,
            title: "Alien".into(),
            year: 1979,
            rate: 8.5,
            synopsis: "Scream".into(),
            genre: Genre {
                id: 1,
                name: "Sci-Fi".into(),
            },
            version: 3,
        };
        let fields = MovieFields::from(&movie);
        assert_eq!(fields.id(), Some(5));
        assert_eq!(fields.version(), Some(3));
        assert_eq!(fields.rate, "8.5");
        assert_eq!(fields.selected_genre(), Some(1));
    }

    const BOUNDARY: &str = "MREVIEWBOUNDARY";

    fn text_part(name: &str, value: &str) -> String {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    }

    fn file_part(name: &str, file_name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{value}\r\n"
        )
    }

    async fn multipart(parts: &[String]) -> Multipart {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        let request = Request::builder()
            .method("POST")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_from_multipart() {
        let form = multipart(&[
            text_part("id", "3"),
            text_part("title", "Inception"),
            text_part("year", "2010"),
            text_part("unexpected", "ignored"),
            file_part("poster", "inception.jpg", "0123456789"),
        ])
        .await;
        let submission = MovieSubmission::from_multipart(form, MAX).await.unwrap();
        assert_eq!(submission.fields.id(), Some(3));
        assert_eq!(submission.fields.title, "Inception");
        assert_eq!(submission.fields.year, "2010");
        let poster = submission.poster.unwrap();
        assert_eq!(poster.file_name, "inception.jpg");
        assert_eq!(poster.data, b"0123456789");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_file_input_is_no_poster() {
        let form = multipart(&[text_part("title", "Inception"), file_part("poster", "", "")]).await;
        let submission = MovieSubmission::from_multipart(form, MAX).await.unwrap();
        assert!(submission.poster.is_none());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_oversized_poster_read_is_capped() {
        let data = "x".repeat(64 * 1024);
        let form = multipart(&[file_part("poster", "big.png", &data)]).await;
        let mut submission = MovieSubmission::from_multipart(form, 10).await.unwrap();
        let poster = submission.poster.take().unwrap();
        assert!(poster.data.len() > 10);
        assert!(poster.data.len() <= data.len());
        assert_eq!(
            poster.check(10),
            Err(PosterRejection::TooLarge { max: 10 })
        );
    }

    #[test]
    fn test_poster_cut_by_body_limit_is_too_large() {
        let poster = PosterUpload {
            file_name: "big.jpg".into(),
            data: vec![7; 100],
            over_limit: true,
        };
        assert_eq!(poster.check(MAX), Err(PosterRejection::TooLarge { max: MAX }));

        let poster = PosterUpload {
            file_name: "big.gif".into(),
            data: vec![7; 100],
            over_limit: true,
        };
        assert_eq!(poster.check(MAX), Err(PosterRejection::UnsupportedType));
    }
}
