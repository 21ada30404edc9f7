//! Canary builder: unique pre-release identifiers.

pub mod builder;

pub use builder::{build_canary_suffix, canary_version};
