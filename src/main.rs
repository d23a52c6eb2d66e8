//! Data Buku - book catalog console and development backend
//!
//! `data-buku` opens the interactive catalog against `backend.base_url`;
//! `data-buku serve` runs the in-memory `data_buku` backend.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use data_buku::{
    api,
    config::AppConfig,
    console::{Console, ConsoleNotifier, PromptConfirm},
    controllers::ListView,
    logging,
    repository::Repository,
    store::HttpBookStore,
    ServerState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init(&config.logging);

    match std::env::args().nth(1).as_deref() {
        None | Some("console") => run_console(config).await,
        Some("serve") => run_backend(config).await,
        Some(other) => {
            anyhow::bail!("Unknown command '{}'; expected 'console' or 'serve'", other)
        }
    }
}

async fn run_console(config: AppConfig) -> anyhow::Result<()> {
    let store = HttpBookStore::from_config(&config)?;
    tracing::info!("Using remote store {}", store.collection_url());

    let input = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let view = ListView::new(
        Arc::new(store),
        Arc::new(ConsoleNotifier),
        Arc::new(PromptConfirm::new(input.clone())),
    );

    Console::new(view, input).run().await?;
    Ok(())
}

async fn run_backend(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Data Buku backend v{}", env!("CARGO_PKG_VERSION"));

    let repository = match &config.server.db_path {
        Some(path) => Repository::open(path).await?,
        None => Repository::in_memory(),
    };

    api::serve(ServerState::new(config, repository)).await?;
    Ok(())
}
