//! Error types for startup and for metric collection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the exporter before it starts serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Resources required: pass --resources currency/account[,currency/account...]")]
    MissingResources,

    #[error("configuration file '{}' does not exist", .0.display())]
    MissingConfigFile(PathBuf),

    #[error("error loading configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("invalid metrics path '{0}': must start with '/' and must not be '/health'")]
    InvalidMetricsPath(String),

    #[error("invalid logging.level '{0}'. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("failed to install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to build upstream HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to register exporter metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Errors raised while collecting one resource during a scrape.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("malformed resource '{0}', expected currency/account")]
    MalformedResource(String),

    #[error("request for '{resource}' failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream answered {status} for '{resource}'")]
    Status { resource: String, status: u16 },

    #[error("could not decode account snapshot for '{resource}': {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("metric registry error: {0}")]
    Registry(#[from] prometheus::Error),
}
