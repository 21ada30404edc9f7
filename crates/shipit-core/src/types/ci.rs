//! Continuous-integration context injected by the outer layer.

use serde::{Deserialize, Serialize};

/// What the CI environment knows about the current build.
///
/// The release engine never reads the environment itself; the embedding
/// layer detects these values and hands them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiContext {
    /// Whether the process runs inside a CI service.
    pub is_ci: bool,
    /// Branch being built.
    pub branch: Option<String>,
    /// Request (pull/merge request) being built.
    pub request_number: Option<u64>,
    /// Build identifier assigned by the CI service.
    pub build_id: Option<String>,
}

impl CiContext {
    /// Context for a local, non-CI run.
    pub fn local() -> Self {
        Self::default()
    }

    /// Sets the branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets the request number.
    pub fn with_request(mut self, number: u64) -> Self {
        self.request_number = Some(number);
        self
    }

    /// Sets the build id.
    pub fn with_build(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = Some(build_id.into());
        self
    }
}
