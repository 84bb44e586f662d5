use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::{response::IntoResponse, routing::get, Router};
use futures::FutureExt;
use mreview_app::state::{AppConfig, AppState};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let app = main_router(state, session_layer(&args)?);

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Listening on {}, site available at {}",
        listener.local_addr()?,
        args.base_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

fn session_layer(args: &ServerConfig) -> Result<SessionManagerLayer<MemoryStore>> {
    let expiry = time::Duration::try_from(args.session_expiry)?;
    let session_store = MemoryStore::default();
    Ok(SessionManagerLayer::new(session_store)
        .with_secure(args.secure_cookies)
        .with_expiry(Expiry::OnInactivity(expiry)))
}

fn main_router(state: AppState, sessions: SessionManagerLayer<MemoryStore>) -> Router<()> {
    let upload_limit_mb = state.config().upload_limit_mb;
    Router::new()
        .nest("/movies", mreview_app::movies::router(upload_limit_mb))
        .nest("/api", mreview_app::rest_api::router())
        .with_state(state)
        .route("/", get(root))
        .route("/health", get(health))
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> impl IntoResponse {
    Redirect::to("/movies")
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let data_dir = config.data_dir();
    if !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
        info!("Created data directory {data_dir:?}");
    }

    let app_config: AppConfig = config.into();
    let database_url = config.database_url();
    debug!("Opening database {database_url}");
    let pool = mreview_dal::new_pool(&database_url).await?;
    mreview_dal::migrate(&pool).await?;

    Ok(AppState::new(app_config, pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parser as _;
    use axum::body::Body;
    use axum::http::{header, Request};
    use mreview_dal::{
        genre::{CreateGenre, GenreRepositoryImpl},
        movie::MovieRepositoryImpl,
    };
    use tower::ServiceExt as _;
    use tracing_test::traced_test;

    async fn test_app(dir: &tempfile::TempDir, extra_args: &[&str]) -> (Router<()>, AppState) {
        let data_dir = dir.path().to_string_lossy().to_string();
        let mut cmd = vec!["mreview-server", "--data-dir", &data_dir];
        cmd.extend_from_slice(extra_args);
        let args = ServerConfig::try_parse_from(cmd).unwrap();
        let state = build_state(&args).await.unwrap();
        (
            main_router(state.clone(), session_layer(&args).unwrap()),
            state,
        )
    }

    async fn test_router(dir: &tempfile::TempDir) -> Router<()> {
        test_app(dir, &[]).await.0
    }

    const BOUNDARY: &str = "MREVIEWBOUNDARY";

    /// Multipart create form streamed in small chunks, as a browser would send it
    fn create_request(genre_id: i64, poster_size: usize) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in [
            ("title", "Inception".to_string()),
            ("year", "2010".to_string()),
            ("rate", "9".to_string()),
            ("synopsis", "A thief who steals secrets".to_string()),
            ("genre_id", genre_id.to_string()),
        ] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"poster\"; filename=\"big.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.resize(body.len() + poster_size, 0xAB);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
            body.chunks(64 * 1024).map(|c| Ok(c.to_vec())).collect();
        Request::post("/movies/create")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from_stream(futures::stream::iter(chunks)))
            .unwrap()
    }

    async fn seed_genre(state: &AppState) -> i64 {
        GenreRepositoryImpl::new(state.pool().clone())
            .create(CreateGenre {
                name: "Sci-Fi".into(),
            })
            .await
            .unwrap()
            .id
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_health_and_root() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(&dir).await;

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/movies");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(&dir).await;

        let response = app
            .clone()
            .oneshot(Request::get("/movies").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        for uri in ["/movies/details", "/movies/edit", "/movies/details/abc"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }

        let response = app
            .oneshot(Request::get("/movies/details/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_poster_over_body_limit_rerenders_form() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = test_app(&dir, &[]).await;
        let genre_id = seed_genre(&state).await;

        let response = app
            .oneshot(create_request(genre_id, 11 * 1024 * 1024))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let page = body_text(response).await;
        assert!(page.contains("Max size is 1024 KiB"));
        assert!(page.contains("Inception"));

        let count = MovieRepositoryImpl::new(state.pool().clone())
            .count()
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_body_limit_below_poster_limit() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = test_app(
            &dir,
            &["--upload-limit-mb", "1", "--max-poster-size", "4194304"],
        )
        .await;
        let genre_id = seed_genre(&state).await;

        let response = app
            .oneshot(create_request(genre_id, 2 * 1024 * 1024))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let page = body_text(response).await;
        assert!(page.contains("Max size is 4096 KiB"));
    }
}
