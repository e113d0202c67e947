//! HTTP route definitions and handlers.
//!
//! This module organizes the HTTP endpoints: metrics exposition, health
//! check, and the redirect of every other path to the metrics path.

mod health_routes;
mod metrics;
mod redirect;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// The metrics route is mounted at the configured path; unknown paths
/// (including `/`) redirect to it.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(metrics::routes(&state.config.metrics_path))
        .merge(health_routes::routes())
        .fallback(redirect::to_metrics)
        .with_state(state)
}
