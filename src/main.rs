//! shipit command-line entry point.
//!
//! Loads configuration, installs logging, wires the orchestrator over the
//! repository in `--repo`, runs one command, and prints its output.

use std::sync::Arc;

use clap::Parser;

use shipit::cli::Cli;
use shipit::offline::OfflineHost;
use shipit::{AppError, BootstrapOptions, ShipitConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = shipit::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, config).await {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!(kind = %e.kind, "Command failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Load configuration from `--config`, or `SHIPIT_CONFIG` when not given
fn load_configuration(cli: &Cli) -> Result<ShipitConfig, AppError> {
    match &cli.config {
        Some(path) => ShipitConfig::load(path),
        None => shipit::load_configuration(),
    }
}

/// Bootstrap the orchestrator and execute the parsed command
async fn run(cli: Cli, config: ShipitConfig) -> Result<String, AppError> {
    tracing::info!("Starting shipit v{}", env!("CARGO_PKG_VERSION"));

    if cli.command.writes_to_platform() && !cli.dry_run {
        return Err(AppError::precondition(
            "No hosting platform client is configured; rerun with --dry-run",
        ));
    }

    let shipit = shipit::bootstrap(
        config,
        Arc::new(OfflineHost),
        BootstrapOptions {
            repo_path: Some(cli.repo.clone()),
            ..BootstrapOptions::default()
        },
    )
    .await?;

    cli.execute(&shipit).await
}
