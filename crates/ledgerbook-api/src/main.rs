//! Ledgerbook API Server
//!
//! HTTP API for accounting records: clients, accounts, cost centers,
//! ledger entries and sales, with paginated search per entity.

use anyhow::Context;
use ledgerbook_api::{AppState, create_router};
use ledgerbook_config::{ApplicationConfig, Validate};
use ledgerbook_data::DataClient;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment (load .env, etc.)
    ledgerbook_common::initialize_environment();

    // Load and validate configuration before anything else
    let config = ApplicationConfig::from_env();

    // Initialize tracing from the configured level, overridable via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.telemetry.tracing_level)
            }),
        )
        .init();

    config.validate().context("Invalid configuration")?;
    info!(
        database = %config.database.safe_connection_string(),
        "Configuration loaded"
    );

    // Connect and migrate
    let data = DataClient::initialize(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    // Create router with shared state
    let state = AppState::from_data_client(&data, config.api.public_base_url.clone());
    let app = create_router(state);

    // Bind and serve
    let addr = config.api.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
