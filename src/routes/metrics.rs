//! Metrics exposition endpoint.

use crate::config::FailurePolicy;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use axum::{
    extract::State, http::header::CONTENT_TYPE, http::StatusCode, response::IntoResponse,
    routing::get, Router,
};
use tracing::error;

/// Creates the metrics route at the configured path.
pub fn routes(path: &str) -> Router<AppState> {
    Router::new().route(path, get(metrics_handler))
}

/// Handler for the metrics endpoint.
///
/// Runs a full collection and returns the samples, followed by the
/// exporter's own metrics, in Prometheus text format.
/// Under the `exit` failure policy a collection error answers 500 and asks
/// the server to shut down.
async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, HTTPError> {
    let scrape = match state.collector.collect().await {
        Ok(scrape) => scrape,
        Err(err) => {
            let message = err.to_string();
            error!(error = message.as_str(), "collection failed");
            if state.config.on_error == FailurePolicy::Exit {
                // A full channel means shutdown is already under way.
                let _ = state.fatal_errors.try_send(err);
            }
            return Err(HTTPError::internal(message));
        }
    };

    let metrics_text = state
        .collector
        .render(&scrape)
        .map_err(|e| HTTPError::internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        metrics_text,
    ))
}
