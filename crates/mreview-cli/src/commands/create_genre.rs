use clap::Parser;
use garde::Validate as _;
use mreview_dal::genre::{CreateGenre, GenreRepository};
use mreview_types::config::BackendConfig;
use tracing::info;

use crate::commands::{open_pool, Executor};

#[derive(Parser, Debug)]
pub struct CreateGenreCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "Genre name, must be unique")]
    name: String,
}

impl Executor for CreateGenreCmd {
    async fn run(self) -> anyhow::Result<()> {
        let payload = CreateGenre {
            name: self.name.trim().to_string(),
        };
        payload.validate()?;

        let pool = open_pool(&self.backend).await?;
        let repository = GenreRepository::new(pool);
        if let Some(existing) = repository.find_by_name(&payload.name).await? {
            anyhow::bail!("Genre {} already exists with id {}", existing.name, existing.id);
        }
        let genre = repository.create(payload).await?;
        info!("Created genre {} ({})", genre.name, genre.id);
        println!("{}\t{}", genre.id, genre.name);
        Ok(())
    }
}
