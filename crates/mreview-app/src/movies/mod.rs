//! HTML pages for browsing and maintaining the movie catalog.

pub mod form;

use axum::{
    extract::{rejection::PathRejection, DefaultBodyLimit, Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use form::{FieldErrors, MovieFields, MovieSubmission, PosterPolicy};
use http::{header, StatusCode};
use mreview_dal::{
    genre::{Genre, GenreRepository},
    movie::{CreateMovie, MovieRepository, UpdateMovie},
};
use mreview_types::poster::image_mime;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::{ApiError, ApiResult},
    notify::{Toast, Toasts},
    state::AppState,
    views::{page_context, poster_data_url, render},
};

const MOVIES_HOME: &str = "/movies";

#[derive(Debug, Serialize)]
struct GenreOption<'a> {
    id: i64,
    name: &'a str,
    selected: bool,
}

struct FormPage<'a> {
    fields: &'a MovieFields,
    errors: &'a FieldErrors,
    genres: &'a [Genre],
    poster: Option<&'a [u8]>,
}

impl FormPage<'_> {
    fn render(&self, toasts: Vec<Toast>) -> ApiResult<Html<String>> {
        let selected = self.fields.selected_genre();
        let genres: Vec<_> = self
            .genres
            .iter()
            .map(|g| GenreOption {
                id: g.id,
                name: &g.name,
                selected: Some(g.id) == selected,
            })
            .collect();

        let mut context = page_context(toasts);
        context.insert("form", self.fields);
        context.insert("errors", self.errors);
        context.insert("genres", &genres);
        context.insert("poster_preview", &self.poster.map(poster_data_url));
        render("movies/form.html", &context)
    }
}

fn movie_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid movie id: {e}")))
}

async fn selected_genre_exists(
    submission: &MovieSubmission,
    genres: &GenreRepository,
) -> ApiResult<bool> {
    match submission.fields.selected_genre() {
        Some(id) => Ok(genres.exists(id).await?),
        None => Ok(false),
    }
}

pub async fn index(movies: MovieRepository, toasts: Toasts) -> ApiResult<impl IntoResponse> {
    let list = movies.list().await?;
    let mut context = page_context(toasts.take().await);
    context.insert("movies", &list);
    render("movies/index.html", &context)
}

pub async fn create_form(genres: GenreRepository, toasts: Toasts) -> ApiResult<impl IntoResponse> {
    let genres = genres.list_all().await?;
    let fields = MovieFields::default();
    let page = FormPage {
        fields: &fields,
        errors: &FieldErrors::default(),
        genres: &genres,
        poster: None,
    };
    page.render(toasts.take().await)
}

pub async fn create(
    State(state): State<AppState>,
    movies: MovieRepository,
    genres: GenreRepository,
    toasts: Toasts,
    multipart: Multipart,
) -> ApiResult<Response> {
    let policy = PosterPolicy {
        required: true,
        max_size: state.config().max_poster_size,
    };
    let mut submission = MovieSubmission::from_multipart(multipart, policy.max_size).await?;
    let genre_exists = selected_genre_exists(&submission, &genres).await?;

    match submission.validate(policy, genre_exists) {
        Ok(valid) => {
            let poster = valid
                .poster
                .ok_or_else(|| ApiError::InternalError("Validated movie without poster".into()))?;
            let movie = movies
                .create(CreateMovie {
                    title: valid.title,
                    year: valid.year,
                    rate: valid.rate,
                    synopsis: valid.synopsis,
                    genre_id: valid.genre_id,
                    poster,
                })
                .await?;
            info!("Created movie {} ({})", movie.id, movie.title);
            toasts.success("Movie created successfully").await;
            Ok(Redirect::to(MOVIES_HOME).into_response())
        }
        Err(errors) => {
            debug!("Movie create rejected: {errors:?}");
            let genres = genres.list_all().await?;
            let page = FormPage {
                fields: &submission.fields,
                errors: &errors,
                genres: &genres,
                poster: None,
            }
            .render(toasts.take().await)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

pub async fn edit_form(
    path: Result<Path<i64>, PathRejection>,
    movies: MovieRepository,
    genres: GenreRepository,
    toasts: Toasts,
) -> ApiResult<impl IntoResponse> {
    let id = movie_id(path)?;
    let movie = movies.get(id).await?;
    let poster = movies.poster(id).await?;
    let genres = genres.list_all().await?;
    let fields = MovieFields::from(&movie);
    let page = FormPage {
        fields: &fields,
        errors: &FieldErrors::default(),
        genres: &genres,
        poster: Some(&poster),
    };
    page.render(toasts.take().await)
}

pub async fn edit(
    State(state): State<AppState>,
    movies: MovieRepository,
    genres: GenreRepository,
    toasts: Toasts,
    multipart: Multipart,
) -> ApiResult<Response> {
    let policy = PosterPolicy {
        required: false,
        max_size: state.config().max_poster_size,
    };
    let mut submission = MovieSubmission::from_multipart(multipart, policy.max_size).await?;
    let id = submission
        .fields
        .id()
        .ok_or_else(|| ApiError::InvalidRequest("Missing movie id".into()))?;
    let existing = movies.get(id).await?;
    // form without version edits whatever is stored now
    let version = match submission.fields.version() {
        Some(version) => version,
        None => {
            submission.fields.version = Some(existing.version.to_string());
            existing.version
        }
    };
    let genre_exists = selected_genre_exists(&submission, &genres).await?;

    match submission.validate(policy, genre_exists) {
        Ok(valid) => {
            let movie = movies
                .update(
                    id,
                    UpdateMovie {
                        title: valid.title,
                        year: valid.year,
                        rate: valid.rate,
                        synopsis: valid.synopsis,
                        genre_id: valid.genre_id,
                        poster: valid.poster,
                        version,
                    },
                )
                .await?;
            info!("Updated movie {} ({})", movie.id, movie.title);
            toasts.success("Movie updated successfully").await;
            Ok(Redirect::to(MOVIES_HOME).into_response())
        }
        Err(errors) => {
            debug!("Movie {id} update rejected: {errors:?}");
            let genres = genres.list_all().await?;
            let poster = movies.poster(id).await?;
            let page = FormPage {
                fields: &submission.fields,
                errors: &errors,
                genres: &genres,
                poster: Some(&poster),
            }
            .render(toasts.take().await)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

pub async fn details(
    path: Result<Path<i64>, PathRejection>,
    movies: MovieRepository,
    toasts: Toasts,
) -> ApiResult<impl IntoResponse> {
    let id = movie_id(path)?;
    let movie = movies.get(id).await?;
    let mut context = page_context(toasts.take().await);
    context.insert("movie", &movie);
    render("movies/details.html", &context)
}

pub async fn confirm_delete(
    path: Result<Path<i64>, PathRejection>,
    movies: MovieRepository,
    toasts: Toasts,
) -> ApiResult<impl IntoResponse> {
    let id = movie_id(path)?;
    let movie = movies.get(id).await?;
    let mut context = page_context(toasts.take().await);
    context.insert("movie", &movie);
    render("movies/delete.html", &context)
}

pub async fn delete(
    path: Result<Path<i64>, PathRejection>,
    movies: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let id = movie_id(path)?;
    movies.delete(id).await?;
    info!("Deleted movie {id}");
    Ok((StatusCode::OK, "OK"))
}

pub async fn poster(
    path: Result<Path<i64>, PathRejection>,
    movies: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let id = movie_id(path)?;
    let data = movies.poster(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, image_mime(&data)),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        data,
    ))
}

pub async fn missing_id() -> ApiError {
    ApiError::InvalidRequest("Missing movie id".into())
}

pub fn router(limit_mb: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(index).delete(missing_id))
        .route("/create", get(create_form).post(create))
        .route("/edit", get(missing_id).post(edit))
        .route("/edit/{id}", get(edit_form))
        .route("/details", get(missing_id))
        .route("/details/{id}", get(details))
        .route("/delete", get(missing_id).post(missing_id))
        .route("/delete/{id}", get(confirm_delete).post(delete))
        .route("/poster/{id}", get(poster))
        .route("/{id}", axum::routing::delete(delete))
        .layer(DefaultBodyLimit::max(1024 * 1024 * limit_mb))
}
