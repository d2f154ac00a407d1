//! REST API for solved-run inspection.
//!
//! Provides two GET endpoints:
//! - `/state` — network summary, KPI report, and latest step summary
//! - `/steps` — full step records with optional timestep range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::sim::{KpiReport, StepSolution};

pub use types::NetworkSummary;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc` — no locks
/// needed since all data is read-only.
pub struct AppState {
    /// Summary of the network the run was solved on.
    pub network: NetworkSummary,
    /// Aggregate KPI report.
    pub kpi: KpiReport,
    /// Per-timestep solutions.
    pub steps: Vec<StepSolution>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/steps", get(handlers::get_steps))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
