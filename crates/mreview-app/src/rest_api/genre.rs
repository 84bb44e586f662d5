use axum::{extract::Path, response::IntoResponse, routing::get, Json, Router};
use mreview_dal::genre::GenreRepository;

use crate::{error::ApiResult, state::AppState};

pub async fn list(repository: GenreRepository) -> ApiResult<impl IntoResponse> {
    let genres = repository.list_all().await?;
    Ok(Json(genres))
}

pub async fn get_genre(Path(id): Path<i64>, repository: GenreRepository) -> ApiResult<impl IntoResponse> {
    let genre = repository.get(id).await?;
    Ok(Json(genre))
}

pub async fn count(repository: GenreRepository) -> ApiResult<impl IntoResponse> {
    let count = repository.count().await?;
    Ok(Json(count))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/count", get(count))
        .route("/{id}", get(get_genre))
}
