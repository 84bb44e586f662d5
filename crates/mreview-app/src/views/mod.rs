//! Server rendered HTML pages.

mod templates;

use axum::response::{Html, IntoResponse, Response};
use base64::{prelude::BASE64_STANDARD, Engine as _};
use http::StatusCode;
use mreview_types::poster::image_mime;
use tera::Context;

use crate::{error::ApiResult, notify::Toast};

pub fn render(template: &str, context: &Context) -> ApiResult<Html<String>> {
    let html = templates::TEMPLATES.render(template, context)?;
    Ok(Html(html))
}

/// Context shared by all regular pages
pub fn page_context(toasts: Vec<Toast>) -> Context {
    let mut context = Context::new();
    context.insert("toasts", &toasts);
    context
}

pub fn render_error(status: StatusCode, message: &str) -> Response {
    let mut context = Context::new();
    context.insert("status", &status.as_u16());
    context.insert("reason", status.canonical_reason().unwrap_or("Error"));
    context.insert("message", message);
    context.insert("toasts", &Vec::<Toast>::new());

    match templates::TEMPLATES.render("error.html", &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Error template failed: {e}");
            (status, message.to_string()).into_response()
        }
    }
}

/// Inline image source for poster previews
pub fn poster_data_url(data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        image_mime(data),
        BASE64_STANDARD.encode(data)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_data_url() {
        assert_eq!(poster_data_url(&[0xff, 0xd8]), "data:image/jpeg;base64,/9g=");
    }

    #[test]
    fn test_error_page() {
        let response = render_error(StatusCode::NOT_FOUND, "Movie not here");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_templates_load() {
        let mut context = page_context(vec![]);
        context.insert("movies", &Vec::<mreview_dal::movie::MovieShort>::new());
        let html = render("movies/index.html", &context).unwrap().0;
        assert!(html.contains("No movies found"));
    }
}
