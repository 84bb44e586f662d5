use std::sync::Arc;

use mreview_dal::Pool;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { app_config, pool }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Maximum accepted poster size in bytes
    pub max_poster_size: usize,
    /// Limit of whole request body for form submissions
    pub upload_limit_mb: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_poster_size: mreview_types::poster::DEFAULT_MAX_POSTER_SIZE,
            upload_limit_mb: 10,
        }
    }
}
