use anyhow::Result;
use mreview_dal::movie::{Movie, MovieShort};
use reqwest::{
    Response,
    multipart::{Form, Part},
};

use crate::TestEnv;

/// Bytes that look like JPEG data
pub fn test_poster(size: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend((0..size.saturating_sub(4)).map(|i| (i % 251) as u8));
    data.truncate(size);
    data
}

#[derive(Debug, Clone)]
pub struct MovieForm {
    pub id: Option<i64>,
    pub version: Option<i64>,
    pub title: String,
    pub year: String,
    pub rate: String,
    pub synopsis: String,
    pub genre_id: String,
    pub poster: Option<(String, Vec<u8>)>,
}

impl MovieForm {
    pub fn inception(genre_id: i64) -> Self {
        MovieForm {
            id: None,
            version: None,
            title: "Inception".to_string(),
            year: "2010".to_string(),
            rate: "9".to_string(),
            synopsis: "A thief who steals secrets...".to_string(),
            genre_id: genre_id.to_string(),
            poster: Some(("inception.jpg".to_string(), test_poster(500_000))),
        }
    }

    pub fn from_movie(movie: &Movie) -> Self {
        MovieForm {
            id: Some(movie.id),
            version: Some(movie.version),
            title: movie.title.clone(),
            year: movie.year.to_string(),
            rate: movie.rate.to_string(),
            synopsis: movie.synopsis.clone(),
            genre_id: movie.genre.id.to_string(),
            poster: None,
        }
    }

    pub fn into_multipart(self) -> Form {
        let mut form = Form::new();
        if let Some(id) = self.id {
            form = form.text("id", id.to_string());
        }
        if let Some(version) = self.version {
            form = form.text("version", version.to_string());
        }
        form = form
            .text("title", self.title)
            .text("year", self.year)
            .text("rate", self.rate)
            .text("synopsis", self.synopsis)
            .text("genre_id", self.genre_id);
        if let Some((file_name, data)) = self.poster {
            form = form.part("poster", Part::bytes(data).file_name(file_name));
        }
        form
    }
}

pub async fn submit_create(env: &TestEnv, form: MovieForm) -> Result<Response> {
    let response = env
        .client
        .post(env.url("movies/create"))
        .multipart(form.into_multipart())
        .send()
        .await?;
    Ok(response)
}

pub async fn submit_edit(env: &TestEnv, form: MovieForm) -> Result<Response> {
    let response = env
        .client
        .post(env.url("movies/edit"))
        .multipart(form.into_multipart())
        .send()
        .await?;
    Ok(response)
}

pub async fn page(env: &TestEnv, path: &str) -> Result<(u16, String)> {
    let response = env.client.get(env.url(path)).send().await?;
    let status = response.status().as_u16();
    Ok((status, response.text().await?))
}

pub async fn list_movies(env: &TestEnv) -> Result<Vec<MovieShort>> {
    let response = env.client.get(env.url("api/movie")).send().await?;
    assert!(response.status().is_success());
    Ok(response.json().await?)
}

pub async fn get_movie(env: &TestEnv, id: i64) -> Result<Movie> {
    let response = env
        .client
        .get(env.url(&format!("api/movie/{id}")))
        .send()
        .await?;
    assert!(response.status().is_success());
    Ok(response.json().await?)
}

pub async fn get_poster(env: &TestEnv, id: i64) -> Result<Vec<u8>> {
    let response = env
        .client
        .get(env.url(&format!("movies/poster/{id}")))
        .send()
        .await?;
    assert!(response.status().is_success());
    Ok(response.bytes().await?.to_vec())
}

/// Creates movie through the form and returns its stored record
pub async fn create_movie(env: &TestEnv, form: MovieForm) -> Result<Movie> {
    let title = form.title.clone();
    let response = submit_create(env, form).await?;
    assert_eq!(response.status().as_u16(), 303);
    let movie = list_movies(env)
        .await?
        .into_iter()
        .filter(|m| m.title == title)
        .max_by_key(|m| m.id)
        .ok_or_else(|| anyhow::anyhow!("Created movie {title} not listed"))?;
    get_movie(env, movie.id).await
}
