pub mod create_genre;
pub mod list_genres;
pub mod migrate;
pub mod seed_genres;

use mreview_types::config::BackendConfig;
use tracing::debug;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

/// Opens catalog database, creating it and applying migrations when needed
pub(crate) async fn open_pool(backend: &BackendConfig) -> anyhow::Result<mreview_dal::Pool> {
    let data_dir = backend.data_dir();
    if !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
    }
    let db_url = backend.database_url();
    debug!("Using database {db_url}");
    let pool = mreview_dal::new_pool(&db_url).await?;
    mreview_dal::migrate(&pool).await?;
    Ok(pool)
}
