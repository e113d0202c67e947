//! Health check endpoints.

use crate::config::HEALTH_PATH;
use crate::state::AppState;
use axum::{
    body::Body,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(HEALTH_PATH, get(health_check))
}

/// Simple health check endpoint.
///
/// Returns a 200 OK status to indicate the service is running. Does not
/// contact upstream.
async fn health_check() -> impl IntoResponse {
    Response::new(Body::from("OK"))
}
