//! Plugin manager: applies plugins to the hook registry at startup.

use std::sync::Arc;

use tracing::{error, info};

use shipit_core::error::AppError;
use shipit_core::result::AppResult;

use crate::hooks::registry::ReleaseHooks;
use crate::registry::{Plugin, PluginInfo, PluginRegistry};

/// Loads plugins in order and hands out the frozen hook registry.
#[derive(Debug, Default)]
pub struct PluginManager {
    plugin_registry: PluginRegistry,
    hooks: ReleaseHooks,
}

impl PluginManager {
    /// Creates a manager with no plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets a plugin tap the release hooks and registers it.
    ///
    /// A plugin that fails to apply is not registered and none of its
    /// handlers stay tapped.
    pub fn load_plugin(&mut self, plugin: Arc<dyn Plugin>) -> AppResult<()> {
        let info = plugin.info();
        if self.plugin_registry.contains(plugin.name()) {
            return Err(AppError::configuration(format!(
                "Plugin '{}' is already registered",
                plugin.name()
            )));
        }

        let checkpoint = self.hooks.checkpoint();
        if let Err(e) = plugin.apply(&mut self.hooks) {
            self.hooks.rollback(&checkpoint);
            error!(plugin = %info.name, error = %e, "Plugin failed to apply");
            return Err(AppError {
                message: format!("Plugin '{}' failed to apply: {}", info.name, e.message),
                ..e
            });
        }
        self.plugin_registry.register(Arc::clone(&plugin))?;

        info!(plugin = %info.name, version = %info.version, "Plugin loaded");
        Ok(())
    }

    /// Loads several plugins in order.
    pub fn load_all<I>(&mut self, plugins: I) -> AppResult<()>
    where
        I: IntoIterator<Item = Arc<dyn Plugin>>,
    {
        for plugin in plugins {
            self.load_plugin(plugin)?;
        }
        Ok(())
    }

    /// Lists all loaded plugins.
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugin_registry.list()
    }

    /// Returns the hook registry while plugins are still loading.
    pub fn hooks(&self) -> &ReleaseHooks {
        &self.hooks
    }

    /// Ends the loading phase; the returned registry is read-only.
    pub fn finish(self) -> Arc<ReleaseHooks> {
        info!(
            plugins = self.plugin_registry.count(),
            handlers = self.hooks.handler_count(),
            "Plugin loading complete"
        );
        Arc::new(self.hooks)
    }
}
