//! Hook system: point storage, dispatch, handler contracts, and the release registry.

pub mod definitions;
pub mod dispatcher;
pub mod handler;
pub mod point;
pub mod registry;

pub use definitions::HookKind;
pub use point::HookPoint;
pub use registry::{HooksCheckpoint, ReleaseHooks};
