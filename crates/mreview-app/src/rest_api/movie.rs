use axum::{extract::Path, response::IntoResponse, routing::get, Json, Router};
use mreview_dal::movie::MovieRepository;

use crate::{error::ApiResult, state::AppState};

/// Movies ordered by rating, best first
pub async fn list(repository: MovieRepository) -> ApiResult<impl IntoResponse> {
    let movies = repository.list().await?;
    Ok(Json(movies))
}

/// Movie with its genre, poster data is not included
pub async fn get_movie(Path(id): Path<i64>, repository: MovieRepository) -> ApiResult<impl IntoResponse> {
    let movie = repository.get(id).await?;
    Ok(Json(movie))
}

pub async fn count(repository: MovieRepository) -> ApiResult<impl IntoResponse> {
    let count = repository.count().await?;
    Ok(Json(count))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/count", get(count))
        .route("/{id}", get(get_movie))
}
