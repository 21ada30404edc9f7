//! # shipit-release
//!
//! The release engine: computes version bumps from commit labels, builds
//! canary identifiers, keeps tracked comments and labels idempotent, and
//! sequences the whole ship workflow through the release hooks.

pub mod canary;
pub mod changelog;
pub mod comment;
pub mod ship;
pub mod version;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use canary::{build_canary_suffix, canary_version};
pub use changelog::MarkdownChangelog;
pub use comment::{Announcer, CommentManager, closing_issue_numbers};
pub use ship::{
    CanaryOptions, CanaryReport, CanaryStatus, Collaborators, CommentOptions, RunState, ShipOptions,
    ShipReport, Shipit,
};
pub use version::{BumpComputation, VersionEngine, aggregate_bump, next_version};
