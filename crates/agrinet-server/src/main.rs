//! Agrinet Server — application entry point.

mod config;
mod error;
mod extract;
mod routes;
mod state;

use agrinet_db::DbManager;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("agrinet=info".parse().expect("directive")),
        )
        .json()
        .init();

    info!("Starting Agrinet server...");

    if let Err(e) = run().await {
        error!(error = %e, "Agrinet server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db).await?;
    agrinet_db::run_migrations(manager.db()).await?;

    let state = AppState::build(manager.db().clone(), config.auth, config.sync)?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
