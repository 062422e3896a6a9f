use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use plantcare::config::{self, Config, StorageBackend};
use plantcare::db::{JsonFileRepository, MongoRepository};
use plantcare::PlantStore;

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(path) = cli.data_file {
        config.data_file = path;
        config.storage = StorageBackend::Json;
    }

    match config.storage {
        StorageBackend::Json => {
            let repository = JsonFileRepository::new(&config.data_file);
            let store = PlantStore::open(repository)
                .await
                .with_context(|| format!("Error al leer plantas de {}", config.data_file.display()))?;
            commands::run(store, cli.command).await
        }
        StorageBackend::Mongo => {
            // Connect to MongoDB:
            let repository = MongoRepository::connect(&config.mongo)
                .await
                .context("Error al conectar con MongoDB")?;
            let store = PlantStore::open(repository).await?;
            commands::run(store, cli.command).await
        }
    }
}
