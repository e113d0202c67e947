use std::collections::HashSet;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Deserializer, Serialize};

use super::logging::LoggingConfig;
use super::upstream::UpstreamConfig;
use crate::cli::Cli;
use crate::error::ConfigError;

/// Prefix of environment variables read by [`load_config`],
/// e.g. `F2POOL_EXPORTER_RESOURCES` or `F2POOL_EXPORTER_UPSTREAM__BASE_URL`.
pub const ENV_PREFIX: &str = "F2POOL_EXPORTER_";

/// Path of the health endpoint, which the metrics path may not shadow.
pub const HEALTH_PATH: &str = "/health";

/// Complete exporter configuration after all sources are merged.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ExporterConfig {
    /// Address to listen on for the web interface and telemetry.
    /// `:port` binds every interface.
    pub listen_address: String,
    /// Path under which metrics are exposed.
    pub metrics_path: String,
    /// Resources (`{currency}/{user or address}`) to scrape, as a list or a
    /// comma separated string.
    #[serde(deserialize_with = "resource_list")]
    #[schemars(with = "Vec<String>")]
    pub resources: Vec<String>,
    pub on_error: FailurePolicy,
    pub share_time: ShareTimeMode,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

/// What a failed resource does to the scrape.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, report `f2pool_up 0` for the resource and keep
    /// serving the others.
    #[default]
    Isolate,
    /// Fail the scrape and stop the exporter with a non-zero exit status.
    Exit,
}

/// How `f2pool_worker_shares_time` is derived from a worker's last share time.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShareTimeMode {
    /// Emit the parsed timestamp; skip workers whose timestamp does not parse.
    #[default]
    Parsed,
    /// Emit only for timestamps that fail to parse, with the value of
    /// 0001-01-01T00:00:00Z. Kept for dashboards built on that output.
    Legacy,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        ExporterConfig {
            listen_address: ":5896".to_string(),
            metrics_path: "/metrics".to_string(),
            resources: Vec::new(),
            on_error: FailurePolicy::default(),
            share_time: ShareTimeMode::default(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExporterConfig {
    /// Checks the invariants the server relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resources.is_empty() {
            return Err(ConfigError::MissingResources);
        }
        if !self.metrics_path.starts_with('/') || self.metrics_path == HEALTH_PATH {
            return Err(ConfigError::InvalidMetricsPath(self.metrics_path.clone()));
        }
        self.logging.level_filter()?;
        Ok(())
    }

    /// The listen address in a form `TcpListener::bind` accepts.
    pub fn bind_address(&self) -> String {
        let address = self.listen_address.trim();
        if address.starts_with(':') {
            format!("0.0.0.0{}", address)
        } else {
            address.to_string()
        }
    }
}

/// Splits a comma separated resource argument, dropping blank entries.
pub fn split_resources(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|resource| !resource.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceList {
    Joined(String),
    Items(Vec<String>),
}

fn resource_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let resources = match ResourceList::deserialize(deserializer)? {
        ResourceList::Joined(raw) => split_resources(&raw),
        ResourceList::Items(items) => items.iter().flat_map(|raw| split_resources(raw)).collect(),
    };
    Ok(dedup_resources(resources))
}

/// Drops repeated resources, keeping the first occurrence in place.
fn dedup_resources(resources: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(resources.len());
    resources
        .into_iter()
        .filter(|resource| seen.insert(resource.clone()))
        .collect()
}

/// Layers defaults, the optional YAML file, the environment and the command line.
pub fn layered_sources(cli: &Cli) -> Result<Figment, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ExporterConfig::default()));

    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(ConfigError::MissingConfigFile(path.clone()));
        }
        figment = figment.merge(Yaml::file(path));
    }

    Ok(figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(cli.overrides())))
}

/// Loads and validates the configuration. Any error here is fatal at startup.
pub fn load_config(cli: &Cli) -> Result<ExporterConfig, ConfigError> {
    let config: ExporterConfig = layered_sources(cli)?.extract()?;
    config.validate()?;
    Ok(config)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(ExporterConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
