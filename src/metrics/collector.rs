//! Scrape-time collection: fetch every resource and turn it into gauges.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::DateTime;
use futures::future::join_all;
use tracing::{debug, error, warn};

use super::descriptors::{encode_text, Gauge, MetricDescriptors, ScrapeSet, ALL_WORKERS};
use super::exporter::ExporterMetrics;
use crate::config::{FailurePolicy, ShareTimeMode};
use crate::error::CollectError;
use crate::models::{AccountSnapshot, Resource, WorkerRecord};
use crate::upstream::AccountSource;

/// Unix seconds of 0001-01-01T00:00:00Z, reported for unparsable share
/// times in [`ShareTimeMode::Legacy`].
pub const UNPARSED_SHARE_TIME: i64 = -62_135_596_800;

/// Produces the full sample set on every scrape.
///
/// Account samples are rebuilt from scratch each time; only the exporter's
/// own metrics outlive a scrape.
pub struct PoolCollector {
    source: Arc<dyn AccountSource>,
    resources: Vec<String>,
    descriptors: MetricDescriptors,
    policy: FailurePolicy,
    share_time: ShareTimeMode,
    exporter: ExporterMetrics,
}

impl PoolCollector {
    pub fn new(
        source: Arc<dyn AccountSource>,
        resources: Vec<String>,
        descriptors: MetricDescriptors,
        policy: FailurePolicy,
        share_time: ShareTimeMode,
    ) -> Result<Self, prometheus::Error> {
        debug!(
            "Creating collector for {} resource(s) from '{}'",
            resources.len(),
            source.get_name()
        );
        Ok(PoolCollector {
            source,
            resources,
            descriptors,
            policy,
            share_time,
            exporter: ExporterMetrics::new()?,
        })
    }

    /// Fetches every resource and returns the samples for this scrape.
    ///
    /// Resources are requested concurrently and emitted in configured order.
    /// Under [`FailurePolicy::Exit`] the first failing resource (in that
    /// order) fails the whole scrape.
    pub async fn collect(&self) -> Result<ScrapeSet, CollectError> {
        let started = Instant::now();
        let result = self.collect_resources().await;
        self.exporter.observe_scrape(started.elapsed());
        result
    }

    /// Renders a scrape together with the exporter's own metrics.
    pub fn render(&self, scrape: &ScrapeSet) -> Result<String, prometheus::Error> {
        let mut families = scrape.gather();
        families.extend(self.exporter.gather());
        families.sort_by(|a, b| a.get_name().cmp(b.get_name()));
        encode_text(&families)
    }

    async fn collect_resources(&self) -> Result<ScrapeSet, CollectError> {
        let scrape = self.descriptors.instantiate()?;

        let results = join_all(self.resources.iter().map(|raw| self.fetch(raw))).await;

        for (raw, result) in self.resources.iter().zip(results) {
            match result {
                Ok((resource, snapshot)) => {
                    self.emit_account(&scrape, &resource, &snapshot);
                    scrape.set(
                        Gauge::Up,
                        &[resource.currency(), resource.account()],
                        1.0,
                    );
                }
                Err(err) => {
                    let (currency, account) = Resource::lossy_labels(raw);
                    self.exporter.count_error(&currency, &account);
                    if self.policy == FailurePolicy::Exit {
                        return Err(err);
                    }
                    error!(
                        currency = currency.as_str(),
                        account = account.as_str(),
                        error = %err,
                        "resource collection failed, skipping it for this scrape"
                    );
                    scrape.set(Gauge::Up, &[currency.as_str(), account.as_str()], 0.0);
                }
            }
        }

        Ok(scrape)
    }

    async fn fetch(&self, raw: &str) -> Result<(Resource, AccountSnapshot), CollectError> {
        let resource = Resource::parse(raw)?;
        let snapshot = self.source.fetch(&resource).await?;
        debug!(
            currency = resource.currency(),
            account = resource.account(),
            workers = snapshot.workers.len(),
            "fetched account snapshot"
        );
        Ok((resource, snapshot))
    }

    fn emit_account(&self, scrape: &ScrapeSet, resource: &Resource, snapshot: &AccountSnapshot) {
        let (currency, account) = (resource.currency(), resource.account());
        let account_labels = [currency, account];
        let total_labels = [currency, account, ALL_WORKERS];

        scrape.set(Gauge::Balance, &account_labels, snapshot.balance);
        scrape.set(Gauge::Paid, &account_labels, snapshot.paid);
        scrape.set(Gauge::Value, &account_labels, snapshot.value);
        scrape.set(Gauge::ValueLastDay, &account_labels, snapshot.value_last_day);

        scrape.set(
            Gauge::StaleHashesRejectedLastDay,
            &total_labels,
            snapshot.stale_hashes_rejected_last_day,
        );
        scrape.set(
            Gauge::StaleHashesRejectedLastHour,
            &total_labels,
            snapshot.stale_hashes_rejected_last_hour,
        );
        scrape.set(Gauge::HashesLastDay, &total_labels, snapshot.hashes_last_day);
        scrape.set(Gauge::HashesLastHour, &total_labels, snapshot.hashes_last_hour);
        scrape.set(Gauge::Hashrate, &total_labels, snapshot.hashrate);

        let mut seen = HashSet::with_capacity(snapshot.workers.len());
        for worker in &snapshot.workers {
            let name = worker.name.as_str();
            if name == ALL_WORKERS || !seen.insert(name) {
                warn!(
                    currency,
                    account,
                    worker = name,
                    "skipping worker whose name is reserved or repeated"
                );
                continue;
            }
            let labels = [currency, account, name];

            scrape.set(Gauge::Hashrate, &labels, worker.hashrate);
            scrape.set(Gauge::HashesLastHour, &labels, worker.hashes_last_hour);
            scrape.set(Gauge::HashesLastDay, &labels, worker.hashes_last_day);
            scrape.set(
                Gauge::StaleHashesRejectedLastHour,
                &labels,
                worker.stale_hashes_rejected_last_hour,
            );
            scrape.set(
                Gauge::StaleHashesRejectedLastDay,
                &labels,
                worker.stale_hashes_rejected_last_day,
            );

            if let Some(seconds) = self.share_time(resource, worker) {
                scrape.set(Gauge::WorkerSharesTime, &labels, seconds as f64);
            }
        }
    }

    fn share_time(&self, resource: &Resource, worker: &WorkerRecord) -> Option<i64> {
        let raw = worker.last_share_time.as_deref()?;

        match (self.share_time, DateTime::parse_from_rfc3339(raw)) {
            (ShareTimeMode::Parsed, Ok(time)) => Some(time.timestamp()),
            (ShareTimeMode::Parsed, Err(e)) => {
                warn!(
                    currency = resource.currency(),
                    account = resource.account(),
                    worker = worker.name.as_str(),
                    "unparsable last share time '{}': {}",
                    raw,
                    e
                );
                None
            }
            (ShareTimeMode::Legacy, Ok(_)) => None,
            (ShareTimeMode::Legacy, Err(_)) => Some(UNPARSED_SHARE_TIME),
        }
    }
}
