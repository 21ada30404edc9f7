//! # shipit-plugin
//!
//! Extension-point framework for shipit. Provides:
//!
//! - A generic [`HookPoint`] parameterised by composition kind
//!   (broadcast, waterfall, series, series-bail, parallel broadcast)
//! - The [`ReleaseHooks`] registry of every point the release workflow fires
//! - The [`Plugin`] capability trait and the load-time [`PluginManager`]

pub mod hooks;
pub mod manager;
pub mod registry;

pub use hooks::definitions::{
    CanaryArgs, CanaryOutcome, CanaryRelease, HookKind, PreviousVersionArgs, PublishedRelease,
    ShipResult,
};
pub use hooks::handler::{AsyncHookHandler, FnHandler, FnSeriesHandler, SeriesHookHandler};
pub use hooks::point::HookPoint;
pub use hooks::registry::{HooksCheckpoint, ReleaseHooks};
pub use manager::PluginManager;
pub use registry::{Plugin, PluginInfo, PluginRegistry};
