//! Command options and run reports.

use serde::{Deserialize, Serialize};

use shipit_core::types::{BumpKind, Commit, ReleaseInfo};

use super::state::RunTrace;

/// Options of `shipit`, `changelog`, and `release`.
#[derive(Debug, Clone, Default)]
pub struct ShipOptions {
    /// Compute and report without mutating anything.
    pub dry_run: bool,
    /// Start of the range (exclusive); defaults to the latest release.
    pub from: Option<String>,
    /// End of the range (inclusive); defaults to HEAD.
    pub to: Option<String>,
}

/// Options of `canary`.
#[derive(Debug, Clone, Default)]
pub struct CanaryOptions {
    /// Compute and report without publishing.
    pub dry_run: bool,
    /// Request being built; defaults to the CI context.
    pub request_number: Option<u64>,
    /// Build id; defaults to the CI context.
    pub build_id: Option<String>,
    /// Start of the range (exclusive); defaults to the latest release.
    pub from: Option<String>,
}

/// Options of `comment`.
#[derive(Debug, Clone, Default)]
pub struct CommentOptions {
    /// Request or issue; defaults to the CI request.
    pub number: Option<u64>,
    /// Tracked comment context.
    pub context: String,
    /// Comment body; required unless deleting.
    pub message: Option<String>,
    /// Delete the tracked comment instead of writing it.
    pub delete: bool,
    /// Edit in place instead of re-posting.
    pub edit: bool,
    /// Log instead of mutating.
    pub dry_run: bool,
}

/// Result of a canary attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanaryStatus {
    /// Dry run; nothing published.
    DryRun,
    /// Published.
    Published,
    /// The publisher reported a failure.
    Failed(String),
}

/// Outcome of the `canary` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanaryReport {
    /// Published identifier, or the would-be one in dry runs and failures.
    pub version: String,
    /// Result.
    pub status: CanaryStatus,
    /// Bump the canary was based on.
    pub bump: BumpKind,
    /// Request the canary was built for.
    pub request_number: Option<u64>,
    /// Commits since the last release.
    pub commits: Vec<Commit>,
}

/// Outcome of a `shipit` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipReport {
    /// Released version, or the would-be version in dry runs.
    pub version: Option<String>,
    /// Previous version, when a release was warranted.
    pub last_release: Option<String>,
    /// Release bump; `None` when no release was warranted.
    pub bump: Option<BumpKind>,
    /// Commits considered.
    pub commits: Vec<Commit>,
    /// Created hosting release.
    pub release: Option<ReleaseInfo>,
    /// Canary outcome on non-trunk branches.
    pub canary: Option<CanaryReport>,
    /// Whether mutations were suppressed.
    pub dry_run: bool,
    /// States entered.
    pub trace: RunTrace,
}

impl ShipReport {
    pub(crate) fn empty(dry_run: bool, trace: RunTrace) -> Self {
        Self {
            version: None,
            last_release: None,
            bump: None,
            commits: Vec::new(),
            release: None,
            canary: None,
            dry_run,
            trace,
        }
    }
}
