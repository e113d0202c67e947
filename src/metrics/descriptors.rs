//! Metric descriptors published by the exporter.

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

/// Prefix of every exported metric name.
pub const NAMESPACE: &str = "f2pool";

/// Value of the `worker` label on account-level rows of the hash family.
pub const ALL_WORKERS: &str = "all";

const ACCOUNT_LABELS: &[&str] = &["currency", "account"];
const WORKER_LABELS: &[&str] = &["currency", "account", "worker"];

/// The gauges the exporter can publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gauge {
    Balance,
    Paid,
    Value,
    ValueLastDay,
    StaleHashesRejectedLastDay,
    StaleHashesRejectedLastHour,
    HashesLastDay,
    HashesLastHour,
    Hashrate,
    WorkerSharesTime,
    Up,
}

impl Gauge {
    pub const ALL: [Gauge; 11] = [
        Gauge::Balance,
        Gauge::Paid,
        Gauge::Value,
        Gauge::ValueLastDay,
        Gauge::StaleHashesRejectedLastDay,
        Gauge::StaleHashesRejectedLastHour,
        Gauge::HashesLastDay,
        Gauge::HashesLastHour,
        Gauge::Hashrate,
        Gauge::WorkerSharesTime,
        Gauge::Up,
    ];

    /// Position of the gauge in [`Gauge::ALL`].
    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Gauge::Balance => "balance",
            Gauge::Paid => "paid",
            Gauge::Value => "value",
            Gauge::ValueLastDay => "value_last_day",
            Gauge::StaleHashesRejectedLastDay => "stale_hashes_rejected_last_day",
            Gauge::StaleHashesRejectedLastHour => "stale_hashes_rejected_last_hour",
            Gauge::HashesLastDay => "hashes_last_day",
            Gauge::HashesLastHour => "hashes_last_hour",
            Gauge::Hashrate => "hashrate",
            Gauge::WorkerSharesTime => "worker_shares_time",
            Gauge::Up => "up",
        }
    }

    fn help(self) -> &'static str {
        match self {
            Gauge::Balance => "Unpaid balance",
            Gauge::Paid => "Paid balance",
            Gauge::Value => "Total revenue",
            Gauge::ValueLastDay => "Revenue of last 24 hours",
            Gauge::StaleHashesRejectedLastDay => "Stale rejected hashes of last 24 hours",
            Gauge::StaleHashesRejectedLastHour => "Stale rejected hashes of last hour",
            Gauge::HashesLastDay => "Hashes of last 24 hours",
            Gauge::HashesLastHour => "Hashes of last hour",
            Gauge::Hashrate => "Current hashrate",
            Gauge::WorkerSharesTime => "Recently submitted shares time (in seconds)",
            Gauge::Up => "Whether the last collection of the resource succeeded",
        }
    }

    /// Label names, in the order values are passed to [`ScrapeSet::set`].
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Gauge::Balance | Gauge::Paid | Gauge::Value | Gauge::ValueLastDay | Gauge::Up => {
                ACCOUNT_LABELS
            }
            _ => WORKER_LABELS,
        }
    }
}

/// Immutable descriptors, built once and owned by the collector.
#[derive(Debug, Clone)]
pub struct MetricDescriptors {
    opts: [Opts; Gauge::ALL.len()],
}

impl MetricDescriptors {
    pub fn new() -> Self {
        let opts = Gauge::ALL
            .map(|gauge| Opts::new(gauge.name(), gauge.help()).namespace(NAMESPACE));
        MetricDescriptors { opts }
    }

    /// Creates an empty gauge set for one scrape.
    ///
    /// Nothing is shared between scrapes, so values never accumulate.
    pub fn instantiate(&self) -> Result<ScrapeSet, prometheus::Error> {
        let registry = Registry::new();
        let mut gauges = Vec::with_capacity(Gauge::ALL.len());

        for (gauge, opts) in Gauge::ALL.iter().zip(&self.opts) {
            let vec = GaugeVec::new(opts.clone(), gauge.labels())?;
            registry.register(Box::new(vec.clone()))?;
            gauges.push(vec);
        }

        Ok(ScrapeSet { registry, gauges })
    }
}

impl Default for MetricDescriptors {
    fn default() -> Self {
        Self::new()
    }
}

/// The samples produced by a single scrape.
pub struct ScrapeSet {
    registry: Registry,
    /// One vector per gauge, in [`Gauge::ALL`] order.
    gauges: Vec<GaugeVec>,
}

impl ScrapeSet {
    /// Sets one sample. `labels` follow [`Gauge::labels`].
    pub fn set(&self, gauge: Gauge, labels: &[&str], value: f64) {
        self.gauges[gauge.index()]
            .with_label_values(labels)
            .set(value);
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Renders all samples in Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        encode_text(&self.gather())
    }
}

/// Encodes metric families in Prometheus text format.
pub fn encode_text(families: &[MetricFamily]) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
