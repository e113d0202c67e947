use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use f2pool_exporter::cli::Cli;
use f2pool_exporter::config::{load_config, print_schema};
use f2pool_exporter::startup;
use f2pool_exporter::utils::logger::init_logging;

// -- Entrypoint

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.print_schema {
        if let Err(e) = print_schema() {
            eprintln!("Error printing configuration schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        resources = ?config.resources,
        metrics_path = config.metrics_path.as_str(),
        on_error = ?config.on_error,
        "Starting f2pool exporter"
    );

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
