//! Typed view of the account statistics returned by the pool API.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;

/// One account as reported by `GET /{currency}/{account}`.
///
/// Every field is required: a missing or mistyped value fails decoding
/// instead of turning into a silent zero. Fields the exporter does not
/// publish are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    /// Unpaid balance.
    pub balance: f64,
    /// Paid balance.
    pub paid: f64,
    /// Total revenue.
    pub value: f64,
    /// Revenue of the last 24 hours.
    pub value_last_day: f64,
    pub stale_hashes_rejected_last_day: f64,
    pub stale_hashes_rejected_last_hour: f64,
    pub hashes_last_day: f64,
    pub hashes_last_hour: f64,
    /// Current hashrate.
    pub hashrate: f64,
    pub workers: Vec<WorkerRecord>,
}

/// A single worker of an account.
///
/// Upstream sends workers as positional arrays:
/// `[name, hashrate, hashes_last_hour, stale_hashes_rejected_last_hour,
/// hashes_last_day, stale_hashes_rejected_last_day, last_share_time, ...]`.
/// Elements past the seventh are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerRecord {
    pub name: String,
    pub hashrate: f64,
    pub hashes_last_hour: f64,
    pub stale_hashes_rejected_last_hour: f64,
    pub hashes_last_day: f64,
    pub stale_hashes_rejected_last_day: f64,
    /// RFC 3339 time of the last submitted share, `None` when upstream sends null.
    pub last_share_time: Option<String>,
}

impl<'de> Deserialize<'de> for WorkerRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(WorkerRecordVisitor)
    }
}

struct WorkerRecordVisitor;

impl<'de> Visitor<'de> for WorkerRecordVisitor {
    type Value = WorkerRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(
            "a worker array [name, hashrate, hashes_last_hour, stale_hashes_rejected_last_hour, \
             hashes_last_day, stale_hashes_rejected_last_day, last_share_time]",
        )
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<WorkerRecord, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let record = WorkerRecord {
            name: next_element(&mut seq, 0)?,
            hashrate: next_element(&mut seq, 1)?,
            hashes_last_hour: next_element(&mut seq, 2)?,
            stale_hashes_rejected_last_hour: next_element(&mut seq, 3)?,
            hashes_last_day: next_element(&mut seq, 4)?,
            stale_hashes_rejected_last_day: next_element(&mut seq, 5)?,
            last_share_time: next_element(&mut seq, 6)?,
        };

        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(record)
    }
}

fn next_element<'de, A, T>(seq: &mut A, index: usize) -> Result<T, A::Error>
where
    A: SeqAccess<'de>,
    T: Deserialize<'de>,
{
    seq.next_element()?
        .ok_or_else(|| de::Error::invalid_length(index, &WorkerRecordVisitor))
}
