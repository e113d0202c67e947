//! Shared application state.
//!
//! Contains the state that is shared across all request handlers: the
//! configuration, the collector and the channel used to request a fatal
//! shutdown.

use crate::config::ExporterConfig;
use crate::error::CollectError;
use crate::metrics::PoolCollector;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; everything in it is
/// read-only or internally synchronized.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ExporterConfig>,
    /// Collector run on every scrape.
    pub collector: Arc<PoolCollector>,
    /// Receives the collection error that should stop the exporter.
    pub fatal_errors: mpsc::Sender<CollectError>,
}
