use clap::Parser;
use mreview_types::config::BackendConfig;
use tracing::info;

use crate::commands::{open_pool, Executor};

#[derive(Parser, Debug)]
pub struct MigrateCmd {
    #[command(flatten)]
    backend: BackendConfig,
}

impl Executor for MigrateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_pool(&self.backend).await?;
        pool.close().await;
        info!("Database {} is up to date", self.backend.database_url());
        Ok(())
    }
}
