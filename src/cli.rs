//! Command-line flags. Every flag is optional here so that values coming
//! from the config file or the environment are only overridden when given.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::config::split_resources;

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "f2pool-exporter",
    version,
    about = "Prometheus exporter for f2pool account statistics"
)]
pub struct Cli {
    /// Resources ({currency}/{user or address}) to retrieve, separated by commas
    #[arg(long, value_name = "LIST")]
    pub resources: Option<String>,

    /// Address to listen on for web interface and telemetry [default: :5896]
    #[arg(long, value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics [default: /metrics]
    #[arg(long, value_name = "PATH")]
    pub telemetry_path: Option<String>,

    /// Failure policy for a resource that cannot be collected: isolate or exit
    #[arg(long, value_name = "POLICY")]
    pub on_error: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, console)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Optional YAML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the JSON schema of the configuration and exit
    #[arg(long)]
    pub print_schema: bool,
}

/// The subset of the configuration set on the command line.
#[derive(Serialize, Debug, Default)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    listen_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    on_error: Option<String>,
    #[serde(skip_serializing_if = "LoggingOverrides::is_empty")]
    logging: LoggingOverrides,
}

#[derive(Serialize, Debug, Default)]
struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

impl LoggingOverrides {
    fn is_empty(&self) -> bool {
        self.level.is_none() && self.format.is_none()
    }
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            resources: self.resources.as_deref().map(split_resources),
            listen_address: self.listen_address.clone(),
            metrics_path: self.telemetry_path.clone(),
            on_error: self.on_error.clone(),
            logging: LoggingOverrides {
                level: self.log_level.clone(),
                format: self.log_format.clone(),
            },
        }
    }
}
