use std::{path::PathBuf, time::Duration};

use crate::error::Result;
pub use clap::Parser;
use mreview_app::state::AppConfig;
use mreview_types::{config::BackendConfig, poster::DEFAULT_MAX_POSTER_SIZE};
use url::Url;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "MREVIEW_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "MREVIEW_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "MREVIEW_BASE_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of the site, as visible to users"
    )]
    pub base_url: Url,

    #[command(flatten)]
    pub backend: BackendConfig,

    #[arg(
        long,
        env = "MREVIEW_UPLOAD_LIMIT_MB",
        default_value = "10",
        help = "Maximum size of submitted form in MB"
    )]
    pub upload_limit_mb: usize,

    #[arg(
        long,
        env = "MREVIEW_MAX_POSTER_SIZE",
        default_value_t = DEFAULT_MAX_POSTER_SIZE,
        help = "Maximum poster image size in bytes"
    )]
    pub max_poster_size: usize,

    #[arg(
        long,
        env = "MREVIEW_SESSION_EXPIRY",
        default_value = "1h",
        help = "Session inactivity expiry in human friendly format (e.g. 1h, 30m)",
        value_parser = humantime::parse_duration
    )]
    pub session_expiry: Duration,

    #[arg(
        long,
        env = "MREVIEW_SECURE_COOKIES",
        help = "Send session cookie only over HTTPS"
    )]
    pub secure_cookies: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.backend.data_dir()
    }

    pub fn database_url(&self) -> String {
        self.backend.database_url()
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            max_poster_size: config.max_poster_size,
            upload_limit_mb: config.upload_limit_mb,
        }
    }
}
