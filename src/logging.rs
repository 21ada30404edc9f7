//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use shipit_core::config::logging::LoggingConfig;
use shipit_core::error::AppError;
use shipit_core::result::AppResult;

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Fails when the level does not parse or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            AppError::configuration(format!("Invalid log level '{}': {e}", config.level))
        })?,
    };

    let installed = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.map_err(|e| AppError::internal(format!("Failed to install logger: {e}")))
}
