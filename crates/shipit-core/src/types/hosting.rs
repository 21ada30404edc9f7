//! Records exchanged with the hosting platform.

use serde::{Deserialize, Serialize};

/// A pull/merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Request number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Description body, if any.
    pub body: Option<String>,
    /// Head commit of the request.
    pub head_sha: String,
}

/// A comment on a request or issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Platform comment id.
    pub id: u64,
    /// Full body, including any hidden markers.
    pub body: String,
}

/// A release to create on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelease {
    /// Tag the release points at.
    pub tag: String,
    /// Display name.
    pub name: String,
    /// Release notes.
    pub notes: String,
    /// Whether this is a pre-release.
    pub prerelease: bool,
}

/// A created release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Platform release id.
    pub id: u64,
    /// Tag of the release.
    pub tag: String,
    /// Browser URL.
    pub url: String,
}

/// State of a commit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Check still running.
    Pending,
    /// Check passed.
    Success,
    /// Check failed.
    Failure,
    /// Check could not run.
    Error,
}

/// A commit status to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Commit the status applies to.
    pub sha: String,
    /// State.
    pub state: StatusState,
    /// Status context (check name).
    pub context: String,
    /// Short description.
    pub description: String,
}
