use clap::{Parser, Subcommand};

use crate::commands::{
    create_genre::CreateGenreCmd, list_genres::ListGenresCmd, migrate::MigrateCmd,
    seed_genres::SeedGenresCmd,
};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for mreview - maintains the movie catalog database (genres, migrations)."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    CreateGenre(CreateGenreCmd),
    ListGenres(ListGenresCmd),
    SeedGenres(SeedGenresCmd),
    Migrate(MigrateCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::CreateGenre(cmd) => cmd.run().await,
            Command::ListGenres(cmd) => cmd.run().await,
            Command::SeedGenres(cmd) => cmd.run().await,
            Command::Migrate(cmd) => cmd.run().await,
        }
    }
}
