//! Release announcement plugin for shipit.
//!
//! Comments on and labels every request a release shipped, along with the
//! issues those requests close, and posts canary versions on the request
//! they were built for.

pub mod hooks;
pub mod plugin;

pub use hooks::AnnounceSettings;
pub use plugin::ReleasedPlugin;
