pub mod rest;

use std::time::Duration;

use anyhow::{Result, anyhow};
use mreview_dal::genre::{CreateGenre, Genre, GenreRepository};
use mreview_server::{
    build_state,
    config::{Parser, ServerConfig},
    run::run_with_state,
};
use rand::Rng as _;
use reqwest::Url;
use tempfile::TempDir;
use tracing::debug;

pub const TEST_GENRES: &[&str] = &["Sci-Fi", "Drama", "Comedy"];

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?;
    let port = port.to_string();
    let base_url = format!("http://localhost:{}", port);
    let args = &[
        "mreview-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--base-url",
        &base_url,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    test_config(test_name)
}

/// Starts server with genres seeded and waits until it responds
pub async fn spawn_server(args: ServerConfig) -> Result<Vec<Genre>> {
    let state = build_state(&args).await?;
    let repository = GenreRepository::new(state.pool().clone());
    for name in TEST_GENRES {
        repository
            .create(CreateGenre {
                name: name.to_string(),
            })
            .await?;
    }
    let genres = repository.list_all().await?;

    let health_url = args.base_url.join("health")?;
    tokio::spawn(async move {
        if let Err(e) = run_with_state(args, state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok(genres),
            _ => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
    Err(anyhow!("Server did not start"))
}

pub struct TestEnv {
    pub client: reqwest::Client,
    pub base_url: Url,
    pub genres: Vec<Genre>,
    _config_guard: ConfigGuard,
}

impl TestEnv {
    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).unwrap()
    }

    pub fn genre_id(&self, name: &str) -> i64 {
        self.genres
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.id)
            .unwrap()
    }
}

/// Running server and a client keeping session cookie, redirects are not followed
pub async fn launch_env(test_name: &str) -> Result<TestEnv> {
    let (args, config_guard) = prepare_env(test_name).await?;
    let base_url = args.base_url.clone();
    let genres = spawn_server(args).await?;
    debug!("Server for {test_name} running at {base_url}");

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(TestEnv {
        client,
        base_url,
        genres,
        _config_guard: config_guard,
    })
}
