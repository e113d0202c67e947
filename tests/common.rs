#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use f2pool_exporter::config::{ExporterConfig, FailurePolicy, UpstreamConfig};
use f2pool_exporter::error::CollectError;
use f2pool_exporter::routes::create_router;
use f2pool_exporter::startup::build_state;
use tokio::sync::mpsc;

/// Upstream answer for `bitcoin/alice` with a single worker.
pub const ACCOUNT_FIXTURE: &str = r#"{
    "balance": 0.00231,
    "paid": 1.25,
    "value": 1.25231,
    "value_last_day": 0.0004,
    "stale_hashes_rejected_last_day": 5,
    "stale_hashes_rejected_last_hour": 1,
    "hashes_last_day": 8640000,
    "hashes_last_hour": 360000,
    "hashrate": 100,
    "workers": [
        ["w1", 10.0, 5.0, 0.0, 100.0, 1.0, "2024-01-01T00:00:00Z"]
    ]
}"#;

pub fn build_config(
    base_url: &str,
    resources: &[&str],
    metrics_path: &str,
    on_error: FailurePolicy,
) -> ExporterConfig {
    ExporterConfig {
        metrics_path: metrics_path.to_string(),
        resources: resources.iter().map(|r| r.to_string()).collect(),
        on_error,
        upstream: UpstreamConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
            ..UpstreamConfig::default()
        },
        ..ExporterConfig::default()
    }
}

pub fn build_app(config: ExporterConfig) -> (Router, mpsc::Receiver<CollectError>) {
    let (state, fatal_rx) = build_state(Arc::new(config)).expect("state should build");
    (create_router(state), fatal_rx)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

/// Finds the value of the sample `name` whose label set is exactly `labels`.
pub fn sample(text: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    let prefix = format!("{}{{", name);
    text.lines()
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .find_map(|rest| {
            let (label_text, value) = rest.split_once("} ")?;
            let pairs: Vec<&str> = label_text.split(',').collect();
            let matches = pairs.len() == labels.len()
                && labels
                    .iter()
                    .all(|(k, v)| pairs.contains(&format!("{}=\"{}\"", k, v).as_str()));
            if matches {
                value.trim().parse().ok()
            } else {
                None
            }
        })
}

/// Sample lines of an exposition, without HELP/TYPE comments.
pub fn sample_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Sample lines of the account metrics, leaving out the exporter's own.
pub fn account_lines(text: &str) -> Vec<&str> {
    sample_lines(text)
        .into_iter()
        .filter(|line| line.starts_with("f2pool_") && !line.starts_with("f2pool_exporter_"))
        .collect()
}
