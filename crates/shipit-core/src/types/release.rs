//! Per-run release context.

use serde::{Deserialize, Serialize};

use super::{BumpKind, Commit};

/// Everything known about a release once its notes exist.
///
/// Built once per run and never mutated after hooks begin firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseContext {
    /// Aggregated bump.
    pub bump: BumpKind,
    /// Commits in the release, oldest first.
    pub commits: Vec<Commit>,
    /// Release notes.
    pub notes: String,
    /// Version being released.
    pub current_version: String,
    /// Version of the previous release.
    pub last_release: String,
}
