//! Version engine: label-driven bump computation.

pub mod engine;

pub use engine::{BumpComputation, VersionEngine, aggregate_bump, next_version};
