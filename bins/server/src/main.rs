//! Potledger API Server
//!
//! Main entry point for the department ledger service.

use std::io::ErrorKind;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use potledger_api::{AppState, create_router};
use potledger_core::FinanceService;
use potledger_core::store::FinanceStore;
use potledger_db::{MemoryStore, SnapshotError, StoreSnapshot};
use potledger_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "potledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Load the store
    let store = match &config.store.snapshot_path {
        Some(path) => match StoreSnapshot::read_from(path).await {
            Ok(snapshot) => {
                info!(
                    path = %path,
                    departments = snapshot.departments.len(),
                    "Loaded store snapshot"
                );
                MemoryStore::from_snapshot(snapshot)
            }
            Err(SnapshotError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path, "Snapshot not found, starting with an empty store");
                MemoryStore::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read snapshot {path}"));
            }
        },
        None => {
            warn!("No snapshot configured, starting with an empty store");
            MemoryStore::new()
        }
    };
    let store: Arc<dyn FinanceStore> = Arc::new(store);

    info!(
        store_timeout_ms = config.ledger.store_timeout_ms,
        max_retries = config.ledger.recalculation_max_retries,
        stale_category_policy = ?config.ledger.stale_category_policy,
        "Ledger engine configured"
    );

    // Create application state
    let state = AppState {
        finance: FinanceService::new(store, config.ledger.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
