//! # shipit
//!
//! Label-driven semantic version bumps, release notes, and releases.
//!
//! Wires the release engine to system git and the plugin system:
//!
//! - [`load_configuration`] reads `SHIPIT_CONFIG` (default `.shipit`) plus
//!   `SHIPIT__*` environment overrides
//! - [`init_logging`] installs the tracing subscriber
//! - [`ci::detect`] builds the [`CiContext`] from the CI environment
//! - [`bootstrap`] loads plugins and returns a ready [`Shipit`]
//! - [`cli`] maps the `shipit` binary's commands onto [`Shipit`]

pub mod ci;
pub mod cli;
pub mod logging;
pub mod offline;
pub mod runtime;

pub use logging::init_logging;
pub use runtime::{BootstrapOptions, bootstrap, load_configuration};

pub use offline::OfflineHost;
pub use plugin_released::ReleasedPlugin;
pub use shipit_core::config::ShipitConfig;
pub use shipit_core::types::{BumpKind, CiContext};
pub use shipit_core::{AppError, AppResult, ErrorKind};
pub use shipit_plugin::{Plugin, PluginManager, ReleaseHooks};
pub use shipit_release::{
    CanaryOptions, CanaryReport, CanaryStatus, CommentOptions, ShipOptions, ShipReport, Shipit,
};
