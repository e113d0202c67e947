use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where and how the exporter reaches the pool statistics API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL; the resource identifier is appended as the path.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Skip TLS certificate verification. Upstream certificate problems must
    /// not block collection; the cost is no protection against tampering.
    pub accept_invalid_certs: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            base_url: "https://api.f2pool.com".to_string(),
            timeout_secs: 10,
            accept_invalid_certs: true,
        }
    }
}
