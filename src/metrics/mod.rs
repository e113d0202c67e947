//! Metrics collection and exposition for Prometheus.
//!
//! Descriptors are built once; every scrape instantiates a fresh gauge set
//! from them and fills it from upstream. The exporter's own metrics are
//! rendered alongside.

mod collector;
mod descriptors;
mod exporter;

pub use collector::{PoolCollector, UNPARSED_SHARE_TIME};
pub use descriptors::{Gauge, MetricDescriptors, ScrapeSet, ALL_WORKERS, NAMESPACE};
pub use exporter::ExporterMetrics;
