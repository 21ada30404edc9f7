//! Released plugin implementation: registers with the shipit plugin system.

use std::sync::{Arc, RwLock};

use tracing::info;

use shipit_core::config::ShipitConfig;
use shipit_core::result::AppResult;
use shipit_core::traits::HostingClient;
use shipit_plugin::{Plugin, PluginInfo, ReleaseHooks};

use crate::hooks::{
    AfterCanaryHook, AfterReleaseHook, AnnounceSettings, SharedSettings, capture_settings,
};

/// Plugin name used for hook attribution.
pub const PLUGIN_NAME: &str = "released";

/// Announces releases and canaries on the hosting platform.
///
/// The label and locking settings passed at construction are defaults;
/// `before_run` replaces them with the configuration every plugin agreed on.
pub struct ReleasedPlugin {
    /// Plugin information
    info: PluginInfo,
    /// Hosting platform client
    client: Arc<dyn HostingClient>,
    /// Settings read at announcement time
    settings: SharedSettings,
}

impl ReleasedPlugin {
    /// Creates the plugin.
    pub fn new(
        client: Arc<dyn HostingClient>,
        released_label: impl Into<String>,
        lock_issues: bool,
    ) -> Self {
        Self {
            info: PluginInfo {
                name: PLUGIN_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: "Comment on and label released requests and issues".to_string(),
            },
            client,
            settings: Arc::new(RwLock::new(AnnounceSettings {
                released_label: released_label.into(),
                lock_issues,
            })),
        }
    }

    /// Creates the plugin from the label and locking settings of `config`.
    pub fn from_config(client: Arc<dyn HostingClient>, config: &ShipitConfig) -> Self {
        Self::new(client, config.released_label.clone(), config.lock_issues)
    }

    /// Settings the next announcement will use.
    pub fn settings(&self) -> Option<AnnounceSettings> {
        self.settings.read().ok().map(|s| s.clone())
    }
}

impl std::fmt::Debug for ReleasedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleasedPlugin")
            .field("info", &self.info)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Plugin for ReleasedPlugin {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn apply(&self, hooks: &mut ReleaseHooks) -> AppResult<()> {
        let settings = Arc::clone(&self.settings);
        hooks
            .before_run
            .tap(PLUGIN_NAME, move |config| capture_settings(&settings, config))?;
        hooks.after_release.tap_async(
            PLUGIN_NAME,
            Arc::new(AfterReleaseHook::new(
                Arc::clone(&self.client),
                Arc::clone(&self.settings),
            )),
        )?;
        hooks.after_canary.tap_async(
            PLUGIN_NAME,
            Arc::new(AfterCanaryHook::new(
                Arc::clone(&self.client),
                Arc::clone(&self.settings),
            )),
        )?;

        info!("Released hooks registered: before_run, after_release, after_canary");
        Ok(())
    }
}
