//! Run states of the orchestrator.

use serde::{Deserialize, Serialize};
use tracing::info;

/// States a ship run moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Nothing has run.
    Idle,
    /// Configuration amended by plugins and validated.
    ConfigReady,
    /// Release bump computed.
    VersionComputed,
    /// Release notes generated; persisted to the changelog on trunk builds.
    ChangelogGenerated,
    /// Packages versioned and published.
    Published,
    /// Hosting release created and announced.
    Released,
    /// Canary published.
    CanaryPublished,
    /// Run finished.
    Done,
}

impl RunState {
    /// Returns the state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ConfigReady => "config_ready",
            Self::VersionComputed => "version_computed",
            Self::ChangelogGenerated => "changelog_generated",
            Self::Published => "published",
            Self::Released => "released",
            Self::CanaryPublished => "canary_published",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered record of the states a run entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTrace {
    states: Vec<RunState>,
}

impl RunTrace {
    /// Starts a trace for a run whose configuration is ready.
    pub fn started() -> Self {
        Self {
            states: vec![RunState::ConfigReady],
        }
    }

    /// Records a transition.
    pub fn enter(&mut self, state: RunState) {
        let from = self.current();
        info!(from = %from, to = %state, "Release state transition");
        self.states.push(state);
    }

    /// Current state.
    pub fn current(&self) -> RunState {
        self.states.last().copied().unwrap_or(RunState::Idle)
    }

    /// All states entered, in order.
    pub fn states(&self) -> &[RunState] {
        &self.states
    }
}
