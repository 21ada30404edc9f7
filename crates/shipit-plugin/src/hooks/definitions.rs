//! Composition kinds and the typed payloads carried by release hook points.

use serde::{Deserialize, Serialize};

use shipit_core::types::{BumpKind, Commit, ReleaseInfo};

/// Calling contract of a hook point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Sync; every handler runs in order, results discarded.
    Broadcast,
    /// Sync; each handler receives the previous handler's result.
    Waterfall,
    /// Async; handlers awaited in order, all run unless one fails.
    Series,
    /// Async; handlers awaited in order until one returns an answer.
    SeriesBail,
    /// Async; handlers run concurrently, the point fails if any fails.
    ParallelBroadcast,
}

impl HookKind {
    /// Returns the string name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::Waterfall => "waterfall",
            Self::Series => "series",
            Self::SeriesBail => "series_bail",
            Self::ParallelBroadcast => "parallel_broadcast",
        }
    }

    /// Returns whether handlers of this kind are async.
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            Self::Series | Self::SeriesBail | Self::ParallelBroadcast
        )
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of the `get_previous_version` point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousVersionArgs {
    /// Most recent release reference found in the commit log.
    pub last_release_ref: Option<String>,
}

/// Input of the `canary` point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanaryArgs {
    /// Bump the canary is based on.
    pub bump: BumpKind,
    /// Suffix that makes the canary unique, e.g. `.42.7`.
    pub canary_identifier: String,
    /// Version the canary suffix is appended to.
    pub next_version: String,
    /// Release notes for the commits; never written to the changelog.
    pub notes: String,
    /// Commits since the last release.
    pub commits: Vec<Commit>,
}

/// Answer of a canary publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanaryOutcome {
    /// The canary was published under this identifier.
    Published(String),
    /// The publisher refused or failed; the message is shown to the user.
    Failed(String),
}

/// Payload of the `after_canary` point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanaryRelease {
    /// Published canary identifier.
    pub version: String,
    /// Request the canary was built for, if known.
    pub request_number: Option<u64>,
    /// Commits since the last release.
    pub commits: Vec<Commit>,
}

/// Payload of the `after_release` point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRelease {
    /// Released version, with tag prefix.
    pub version: String,
    /// Previous version.
    pub last_release: String,
    /// Commits in the release.
    pub commits: Vec<Commit>,
    /// Release notes.
    pub notes: String,
    /// Created platform release; `None` when creation was skipped.
    pub release: Option<ReleaseInfo>,
}

/// Payload of the `after_ship` point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipResult {
    /// Resulting version, if one was produced.
    pub version: Option<String>,
    /// Commits considered by the run.
    pub commits: Vec<Commit>,
    /// Whether the run produced a canary.
    pub canary: bool,
}
