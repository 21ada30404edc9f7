//! Commit-log provider contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::Commit;

/// Source of commits and release references.
#[async_trait]
pub trait CommitLog: Send + Sync {
    /// Commits after `from` (exclusive) up to `to` (inclusive, default HEAD),
    /// oldest first.
    async fn commits_between(&self, from: &str, to: Option<&str>) -> AppResult<Vec<Commit>>;

    /// Reference of the most recent release, if any release exists.
    async fn latest_release_ref(&self) -> AppResult<Option<String>>;

    /// Reference of the first commit in the repository.
    async fn first_commit_ref(&self) -> AppResult<String>;

    /// Abbreviated hash of HEAD.
    async fn current_head_short_sha(&self) -> AppResult<String>;
}
