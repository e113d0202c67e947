//! Library exports for f2pool-exporter, shared between the binary and tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod startup;
pub mod state;
pub mod upstream;
pub mod utils;
