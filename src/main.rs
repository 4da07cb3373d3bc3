use std::sync::Arc;

use cocktail_finder::server::{start_server, AppState};
use cocktail_finder::{AppConfig, CocktailDbClient};
use log::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    info!(
        "Loaded configuration (timeout {}s, catalog batch size {})",
        config.timeout, config.catalog.batch_size
    );

    let client = CocktailDbClient::new(&config)?;
    let state = AppState::new(Arc::new(client), config.catalog.clone());

    start_server(&config, state).await
}
