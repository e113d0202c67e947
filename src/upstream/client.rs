use std::time::Duration;

use tracing::{debug, info};

use super::AccountSource;
use crate::config::UpstreamConfig;
use crate::error::{CollectError, ConfigError};
use crate::models::{AccountSnapshot, Resource};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches account snapshots over HTTP from the pool API.
///
/// The inner `reqwest::Client` pools connections and is shared by all
/// concurrent scrapes.
pub struct PoolApiSource {
    client: reqwest::Client,
    base_url: String,
}

impl PoolApiSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        info!(
            "Creating pool API client for '{}' (timeout={}s, accept_invalid_certs={})",
            config.base_url, config.timeout_secs, config.accept_invalid_certs
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, resource: &Resource) -> String {
        format!("{}/{}", self.base_url, resource)
    }
}

#[async_trait::async_trait]
impl AccountSource for PoolApiSource {
    fn get_name(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, resource: &Resource) -> Result<AccountSnapshot, CollectError> {
        let url = self.url_for(resource);
        debug!("Sending account request to: {}", url);

        let transport = |source| CollectError::Transport {
            resource: resource.to_string(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|source| CollectError::Decode {
            resource: resource.to_string(),
            source,
        })
    }
}
