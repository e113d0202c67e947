//! Access to the pool statistics API.

pub mod client;

pub use client::PoolApiSource;

use crate::error::CollectError;
use crate::models::{AccountSnapshot, Resource};

/// A source of account snapshots. The collector only talks to upstream
/// through this trait.
#[async_trait::async_trait]
pub trait AccountSource: Send + Sync {
    /// A descriptive name for the source (for logs/debug).
    fn get_name(&self) -> &str;

    /// Fetches a fresh snapshot of one account.
    async fn fetch(&self, resource: &Resource) -> Result<AccountSnapshot, CollectError>;
}
