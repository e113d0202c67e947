//! Data carried between the upstream API and the collector.

pub mod account;
pub mod resource;

pub use account::{AccountSnapshot, WorkerRecord};
pub use resource::Resource;
