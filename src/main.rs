use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use qr_feedback_api::app::app;
use qr_feedback_api::config;
use qr_feedback_api::database::DatabaseManager;
use qr_feedback_api::network::{probe_local_ipv4, LocalAddress};
use qr_feedback_api::state::AppState;
use qr_feedback_api::store::{AdvisorStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("qr_feedback_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config().clone();
    config.validate()?;
    tracing::info!("Starting QR Feedback API in {:?} mode", config.environment);

    let store: Arc<dyn AdvisorStore> = match &config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            if qr_feedback_api::is_production!() {
                tracing::warn!("DATABASE_URL is not set; feedback will be lost on restart");
            } else {
                tracing::info!("DATABASE_URL is not set; using in-memory store");
            }
            Arc::new(MemoryStore::new())
        }
    };

    let local_address = LocalAddress::detect();
    tracing::info!("Local IP: {}", local_address.get());
    let refresher = local_address.spawn_refresh(
        Duration::from_secs(config.network.refresh_interval_secs),
        probe_local_ipv4,
    );

    let state = AppState::new(config, store, local_address)?;

    if state.config.qr.refresh_on_startup {
        let qr = state.qr.clone();
        tokio::spawn(async move {
            if let Err(e) = qr.refresh_all().await {
                tracing::error!("Error updating QR codes: {}", e);
            }
        });
    }

    let bind_addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("QR Feedback API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drop(refresher);
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
