//! Metrics about the exporter itself.
//!
//! Unlike the account gauges these live for the whole process: the process
//! collector reads `/proc` on every gather, the scrape duration is replaced by
//! each scrape, and the error counter only grows.

use std::time::Duration;

use prometheus::proto::MetricFamily;
use prometheus::{Gauge, IntCounterVec, Opts, Registry};

use super::descriptors::NAMESPACE;

const SUBSYSTEM: &str = "exporter";

pub struct ExporterMetrics {
    registry: Registry,
    scrape_duration: Gauge,
    scrape_errors: IntCounterVec,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scrape_duration = Gauge::with_opts(
            Opts::new(
                "scrape_duration_seconds",
                "Duration of the last scrape of all resources",
            )
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
        )?;
        registry.register(Box::new(scrape_duration.clone()))?;

        let scrape_errors = IntCounterVec::new(
            Opts::new(
                "scrape_errors_total",
                "Number of failed collections of a resource",
            )
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
            &["currency", "account"],
        )?;
        registry.register(Box::new(scrape_errors.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(ExporterMetrics {
            registry,
            scrape_duration,
            scrape_errors,
        })
    }

    pub fn observe_scrape(&self, elapsed: Duration) {
        self.scrape_duration.set(elapsed.as_secs_f64());
    }

    pub fn count_error(&self, currency: &str, account: &str) {
        self.scrape_errors
            .with_label_values(&[currency, account])
            .inc();
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}
