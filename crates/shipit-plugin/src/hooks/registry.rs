//! Release hook registry: every extension point the workflow fires.
//!
//! Points are declared once here with their composition kind and payload
//! types; plugins tap them at load time and the registry is read-only for
//! the rest of the process.

use serde::Serialize;

use shipit_core::config::ShipitConfig;
use shipit_core::types::ReleaseContext;

use super::definitions::{
    CanaryArgs, CanaryOutcome, CanaryRelease, HookKind, PreviousVersionArgs, PublishedRelease,
    ShipResult,
};
use super::point::HookPoint;

/// Summary of one point for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookSummary {
    /// Point name.
    pub name: &'static str,
    /// Composition kind.
    pub kind: HookKind,
    /// Plugins tapped, in order.
    pub owners: Vec<String>,
}

/// Handler counts of every point, taken before a plugin applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HooksCheckpoint(Vec<usize>);

/// All extension points of the release workflow.
#[derive(Debug)]
pub struct ReleaseHooks {
    /// Amend the configuration snapshot before anything runs.
    pub modify_config: HookPoint<ShipitConfig, ShipitConfig>,
    /// Observe the final configuration.
    pub before_run: HookPoint<ShipitConfig>,
    /// Supply the previously released version.
    pub get_previous_version: HookPoint<PreviousVersionArgs, Option<String>>,
    /// Amend release notes before they are persisted.
    pub before_commit_changelog: HookPoint<ReleaseContext>,
    /// React to the persisted changelog.
    pub after_add_to_changelog: HookPoint<ReleaseContext>,
    /// Write the new version into package manifests.
    pub version: HookPoint<ReleaseContext>,
    /// Observe the versioned tree.
    pub after_version: HookPoint<ReleaseContext>,
    /// Publish packages.
    pub publish: HookPoint<ReleaseContext>,
    /// Observe published packages.
    pub after_publish: HookPoint<ReleaseContext>,
    /// Publish a canary; the first publisher that answers wins.
    pub canary: HookPoint<CanaryArgs, Option<CanaryOutcome>>,
    /// Observe a published canary.
    pub after_canary: HookPoint<CanaryRelease>,
    /// Observe a created release.
    pub after_release: HookPoint<PublishedRelease>,
    /// Observe the end of a ship run.
    pub after_ship: HookPoint<ShipResult>,
}

impl ReleaseHooks {
    /// Creates a registry with every point empty.
    pub fn new() -> Self {
        Self {
            modify_config: HookPoint::new("modify_config", HookKind::Waterfall),
            before_run: HookPoint::new("before_run", HookKind::Broadcast),
            get_previous_version: HookPoint::new("get_previous_version", HookKind::SeriesBail),
            before_commit_changelog: HookPoint::new("before_commit_changelog", HookKind::Series),
            after_add_to_changelog: HookPoint::new("after_add_to_changelog", HookKind::Series),
            version: HookPoint::new("version", HookKind::ParallelBroadcast),
            after_version: HookPoint::new("after_version", HookKind::ParallelBroadcast),
            publish: HookPoint::new("publish", HookKind::ParallelBroadcast),
            after_publish: HookPoint::new("after_publish", HookKind::ParallelBroadcast),
            canary: HookPoint::new("canary", HookKind::SeriesBail),
            after_canary: HookPoint::new("after_canary", HookKind::ParallelBroadcast),
            after_release: HookPoint::new("after_release", HookKind::ParallelBroadcast),
            after_ship: HookPoint::new("after_ship", HookKind::Broadcast),
        }
    }

    /// Returns every point with its tapped plugins.
    pub fn registered_hooks(&self) -> Vec<HookSummary> {
        fn summary<A, R>(point: &HookPoint<A, R>) -> HookSummary {
            HookSummary {
                name: point.name(),
                kind: point.kind(),
                owners: point.owners().into_iter().map(String::from).collect(),
            }
        }

        vec![
            summary(&self.modify_config),
            summary(&self.before_run),
            summary(&self.get_previous_version),
            summary(&self.before_commit_changelog),
            summary(&self.after_add_to_changelog),
            summary(&self.version),
            summary(&self.after_version),
            summary(&self.publish),
            summary(&self.after_publish),
            summary(&self.canary),
            summary(&self.after_canary),
            summary(&self.after_release),
            summary(&self.after_ship),
        ]
    }

    /// Records how many handlers each point holds.
    pub fn checkpoint(&self) -> HooksCheckpoint {
        HooksCheckpoint(
            self.registered_hooks()
                .iter()
                .map(|hook| hook.owners.len())
                .collect(),
        )
    }

    /// Removes every handler tapped since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: &HooksCheckpoint) {
        let len = |index: usize| checkpoint.0.get(index).copied().unwrap_or(0);
        self.modify_config.truncate(len(0));
        self.before_run.truncate(len(1));
        self.get_previous_version.truncate(len(2));
        self.before_commit_changelog.truncate(len(3));
        self.after_add_to_changelog.truncate(len(4));
        self.version.truncate(len(5));
        self.after_version.truncate(len(6));
        self.publish.truncate(len(7));
        self.after_publish.truncate(len(8));
        self.canary.truncate(len(9));
        self.after_canary.truncate(len(10));
        self.after_release.truncate(len(11));
        self.after_ship.truncate(len(12));
    }

    /// Returns the number of handlers across all points.
    pub fn handler_count(&self) -> usize {
        self.registered_hooks().iter().map(|h| h.owners.len()).sum()
    }
}

impl Default for ReleaseHooks {
    fn default() -> Self {
        Self::new()
    }
}
