//! Toast notifications carried over a redirect in the user session.

use axum::extract::FromRequestParts;
use http::request::Parts;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

use crate::error::ApiError;

const TOASTS_KEY: &str = "toasts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

fn push_unique(queue: &mut Vec<Toast>, toast: Toast) {
    if !queue.contains(&toast) {
        queue.push(toast);
    }
}

pub struct Toasts {
    session: Session,
}

impl Toasts {
    /// Queues a success message for the next rendered page, failures are only logged
    pub async fn success(&self, message: impl Into<String>) {
        let toast = Toast {
            kind: ToastKind::Success,
            message: message.into(),
        };
        let mut queue = match self.session.get::<Vec<Toast>>(TOASTS_KEY).await {
            Ok(queue) => queue.unwrap_or_default(),
            Err(e) => {
                warn!("Cannot read toasts from session: {e}");
                Vec::new()
            }
        };
        push_unique(&mut queue, toast);
        if let Err(e) = self.session.insert(TOASTS_KEY, queue).await {
            warn!("Cannot store toast in session: {e}");
        }
    }

    /// Removes and returns all pending toasts
    pub async fn take(&self) -> Vec<Toast> {
        match self.session.remove::<Vec<Toast>>(TOASTS_KEY).await {
            Ok(queue) => queue.unwrap_or_default(),
            Err(e) => {
                warn!("Cannot take toasts from session: {e}");
                Vec::new()
            }
        }
    }
}

impl<S> FromRequestParts<S> for Toasts
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::InternalError(msg.to_string()))?;
        Ok(Toasts { session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_suppressed() {
        let mut queue = Vec::new();
        let toast = Toast {
            kind: ToastKind::Success,
            message: "Movie created successfully".into(),
        };
        push_unique(&mut queue, toast.clone());
        push_unique(&mut queue, toast.clone());
        push_unique(
            &mut queue,
            Toast {
                kind: ToastKind::Success,
                message: "Movie updated successfully".into(),
            },
        );
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0], toast);
    }

    #[test]
    fn test_toast_serialization() {
        let toast = Toast {
            kind: ToastKind::Success,
            message: "Done".into(),
        };
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "success", "message": "Done"}));
    }
}
