//! Read-only JSON view of the catalog.

pub mod genre;
pub mod movie;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/genre", genre::router())
        .nest("/movie", movie::router())
}
