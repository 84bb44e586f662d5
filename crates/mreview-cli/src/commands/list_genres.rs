use clap::Parser;
use mreview_dal::genre::GenreRepository;
use mreview_types::config::BackendConfig;

use crate::commands::{open_pool, Executor};

#[derive(Parser, Debug)]
pub struct ListGenresCmd {
    #[command(flatten)]
    backend: BackendConfig,
}

impl Executor for ListGenresCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_pool(&self.backend).await?;
        let genres = GenreRepository::new(pool).list_all().await?;
        for genre in genres {
            println!("{}\t{}", genre.id, genre.name);
        }
        Ok(())
    }
}
