pub mod clients;
pub mod config;
pub mod error;
pub mod insights;
pub mod web;

use std::sync::Arc;

use crate::clients::AssemblyAiClient;
use crate::config::Config;
use crate::error::Error;
use crate::web::AppState;

/// Load config, wire the vendor client, and serve until shutdown.
pub async fn run() -> Result<(), Error> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    log::info!("Loaded config: {:?}", config);

    let provider = Arc::new(AssemblyAiClient::new(&config));
    let app = web::build_app(AppState::new(provider));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("Audiolens listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
