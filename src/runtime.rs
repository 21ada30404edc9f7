//! Process wiring: configuration, plugins, and collaborators.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use plugin_released::ReleasedPlugin;
use shipit_core::config::ShipitConfig;
use shipit_core::result::AppResult;
use shipit_core::traits::HostingClient;
use shipit_core::types::CiContext;
use shipit_git::{FileChangelog, GitCommitLog, GitRepo};
use shipit_plugin::{Plugin, PluginManager};
use shipit_release::{Collaborators, Shipit};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "SHIPIT_CONFIG";

/// Configuration file used when `SHIPIT_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = ".shipit";

/// Loads the configuration file named by `SHIPIT_CONFIG` and the
/// `SHIPIT__*` environment overrides.
pub fn load_configuration() -> AppResult<ShipitConfig> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    info!(path = %path, "Loading configuration");
    ShipitConfig::load(&path)
}

/// Inputs of [`bootstrap`] beyond configuration and the hosting client.
#[derive(Debug, Default)]
pub struct BootstrapOptions {
    /// Repository working tree; defaults to the current directory.
    pub repo_path: Option<PathBuf>,
    /// CI context; detected from the environment when unset.
    pub ci: Option<CiContext>,
    /// Plugins loaded before the built-in announcement plugin.
    pub plugins: Vec<Arc<dyn Plugin>>,
}

/// Loads plugins and builds a [`Shipit`] over the git repository at
/// `options.repo_path`.
pub async fn bootstrap(
    config: ShipitConfig,
    hosting: Arc<dyn HostingClient>,
    options: BootstrapOptions,
) -> AppResult<Shipit> {
    let repo = GitRepo::open(options.repo_path.unwrap_or_else(|| PathBuf::from("."))).await?;
    let ci = options.ci.unwrap_or_else(crate::ci::detect);

    let mut manager = PluginManager::new();
    manager.load_all(options.plugins)?;
    manager.load_plugin(Arc::new(ReleasedPlugin::from_config(hosting.clone(), &config)))?;

    info!(
        plugins = manager.list_plugins().len(),
        repo = %repo.path().display(),
        "Plugins loaded"
    );

    let collaborators = Collaborators {
        commit_log: Arc::new(GitCommitLog::with_hosting(repo.clone(), hosting.clone())),
        changelog_writer: Arc::new(FileChangelog::new(repo, config.changelog_path.clone())),
        changelog_generator: None,
        hosting,
        ci,
    };

    Shipit::new(config, manager.finish(), collaborators)
}
