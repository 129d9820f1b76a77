//! HTTP API layer with Axum routes and extractors.
//!
//! This crate provides:
//! - REST API routes for department ledgers, summaries and recalculation
//! - The caller identity extractor
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use potledger_core::FinanceService;
use potledger_core::store::FinanceStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger and recalculation operations over the configured store.
    pub finance: FinanceService<dyn FinanceStore>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
