//! Plugin registry: loaded plugin instances in load order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use shipit_core::error::AppError;
use shipit_core::result::AppResult;

use crate::hooks::registry::ReleaseHooks;

/// Metadata about a loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    pub description: String,
}

/// Capability every plugin implements.
///
/// A plugin taps the points it cares about in [`Plugin::apply`]; the order
/// plugins are applied in is the only ordering control they have.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Unique plugin name, used for diagnostics.
    fn name(&self) -> &str;

    /// Plugin metadata.
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name().to_string(),
            version: String::new(),
            description: String::new(),
        }
    }

    /// Taps handlers onto the release hooks.
    fn apply(&self, hooks: &mut ReleaseHooks) -> AppResult<()>;
}

/// Registry of loaded plugins, in load order.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin; names must be unique.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> AppResult<()> {
        let name = plugin.name().to_string();
        if self.contains(&name) {
            return Err(AppError::configuration(format!(
                "Plugin '{name}' is already registered"
            )));
        }

        info!(plugin = %name, "Registering plugin");
        self.plugins.push(plugin);
        Ok(())
    }

    /// Gets a plugin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.iter().find(|p| p.name() == name).cloned()
    }

    /// Checks whether a plugin is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    /// Lists plugin metadata in load order.
    pub fn list(&self) -> Vec<PluginInfo> {
        self.plugins.iter().map(|p| p.info()).collect()
    }

    /// Returns plugin count.
    pub fn count(&self) -> usize {
        self.plugins.len()
    }
}
