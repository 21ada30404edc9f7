//! Release orchestrator: sequences version, changelog, publish, and
//! release through the release hooks.

pub mod options;
pub mod service;
pub mod state;

pub use options::{
    CanaryOptions, CanaryReport, CanaryStatus, CommentOptions, ShipOptions, ShipReport,
};
pub use service::{Collaborators, Shipit};
pub use state::{RunState, RunTrace};
