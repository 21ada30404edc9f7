//! Changelog text generation and persistence contracts.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{BumpKind, Commit};

/// Renders release notes for a commit list.
pub trait ChangelogGenerator: Send + Sync {
    /// Generates the notes for a release following `previous_version`.
    fn generate(&self, commits: &[Commit], previous_version: &str, bump: BumpKind) -> String;
}

/// Persists release notes into the repository.
#[async_trait]
pub trait ChangelogWriter: Send + Sync {
    /// Records `notes` under `version` and commits the result.
    async fn commit_changelog(&self, version: &str, notes: &str) -> AppResult<()>;
}
