use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
};

/// Permanently redirects to the metrics path.
pub async fn to_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(LOCATION, state.config.metrics_path.clone())],
    )
}
