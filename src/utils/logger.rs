use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::ConfigError;

/// Installs the global tracing subscriber.
///
/// The configured level is the default directive; `RUST_LOG` may refine it
/// (e.g. `RUST_LOG=f2pool_exporter=debug,reqwest=warn`).
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), ConfigError> {
    let level_filter = logging_config.level_filter()?;

    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    match logging_config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter_layer)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .try_init()?,
        LogFormat::Console => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().pretty())
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_level_before_installing() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            format: LogFormat::Json,
        };
        assert!(matches!(
            init_logging(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
