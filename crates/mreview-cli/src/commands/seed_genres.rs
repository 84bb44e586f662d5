use clap::Parser;
use mreview_dal::genre::{CreateGenre, GenreRepository};
use mreview_types::config::BackendConfig;
use tracing::{debug, info};

use crate::commands::{open_pool, Executor};

pub const DEFAULT_GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "History",
    "Horror",
    "Music",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "War",
    "Western",
];

#[derive(Parser, Debug)]
pub struct SeedGenresCmd {
    #[command(flatten)]
    backend: BackendConfig,
}

/// Inserts missing genres, returns how many were added
pub async fn seed(repository: &GenreRepository, names: &[&str]) -> anyhow::Result<usize> {
    let mut added = 0;
    for name in names {
        if repository.find_by_name(name).await?.is_some() {
            debug!("Genre {name} already exists");
            continue;
        }
        repository
            .create(CreateGenre {
                name: name.to_string(),
            })
            .await?;
        added += 1;
    }
    Ok(added)
}

impl Executor for SeedGenresCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = open_pool(&self.backend).await?;
        let repository = GenreRepository::new(pool);
        let added = seed(&repository, DEFAULT_GENRES).await?;
        info!("Seeded {added} genres");
        Ok(())
    }
}
