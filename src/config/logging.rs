use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;

/// LoggingConfig controls how we initialize tracing/logging.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String, // e.g. "info", "debug", "warn"
    pub format: LogFormat,
}

/// Output format of the log subscriber.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable output with ANSI colors.
    #[default]
    Console,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Console,
        }
    }
}

impl LoggingConfig {
    /// Parses the configured level string.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.level.trim().to_lowercase().as_str() {
            "trace" => Ok(LevelFilter::TRACE),
            "debug" => Ok(LevelFilter::DEBUG),
            "info" => Ok(LevelFilter::INFO),
            "warn" => Ok(LevelFilter::WARN),
            "error" => Ok(LevelFilter::ERROR),
            _ => Err(ConfigError::InvalidLogLevel(self.level.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_case_insensitive() {
        let config = LoggingConfig {
            level: " DEBUG ".to_string(),
            format: LogFormat::Json,
        };
        assert_eq!(config.level_filter().unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            config.level_filter(),
            Err(ConfigError::InvalidLogLevel(level)) if level == "verbose"
        ));
    }
}
