use axum::{
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use tracing::{debug, error};

use crate::views::render_error;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(mreview_dal::Error),

    #[error("Multipart error: {0}")]
    MultipartError(#[from] MultipartError),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<mreview_dal::Error> for ApiError {
    fn from(value: mreview_dal::Error) -> Self {
        match value {
            mreview_dal::Error::RecordNotFound(what) => ApiError::ResourceNotFound(what),
            mreview_dal::Error::FailedUpdate { id, version } => ApiError::Conflict(format!(
                "Movie {id} was changed by someone else since version {version}, reload and try again"
            )),
            other => ApiError::DatabaseError(other),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MultipartError(e) => e.status(),
            ApiError::DatabaseError(_)
            | ApiError::TemplateError(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Request failed: {self}");
            "An internal error occurred".to_string()
        } else {
            debug!("Request rejected ({status}): {self}");
            self.to_string()
        };
        render_error(status, &message)
    }
}
