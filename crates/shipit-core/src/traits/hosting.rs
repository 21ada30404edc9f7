//! Hosting platform client contract.
//!
//! Requests and issues share one number space, so every mutation takes a
//! plain `number`. Failures are reported as [`crate::ErrorKind::Platform`]
//! errors carrying the platform status code; retry policy belongs to the
//! implementation.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Comment, Commit, NewRelease, ReleaseInfo, Request, StatusUpdate};

/// Operations the release engine needs from the hosting platform.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// Fetches a request.
    async fn get_request(&self, number: u64) -> AppResult<Request>;

    /// Commits belonging to a request.
    async fn get_commits_for_request(&self, number: u64) -> AppResult<Vec<Commit>>;

    /// Labels on a request or issue.
    async fn get_labels(&self, number: u64) -> AppResult<Vec<String>>;

    /// Adds a label to a request or issue.
    async fn add_label(&self, number: u64, label: &str) -> AppResult<()>;

    /// Comments on a request or issue, oldest first.
    async fn list_comments(&self, number: u64) -> AppResult<Vec<Comment>>;

    /// Creates a comment.
    async fn create_comment(&self, number: u64, body: &str) -> AppResult<Comment>;

    /// Replaces the body of an existing comment.
    async fn edit_comment(&self, number: u64, comment_id: u64, body: &str) -> AppResult<()>;

    /// Deletes a comment.
    async fn delete_comment(&self, number: u64, comment_id: u64) -> AppResult<()>;

    /// Locks an issue's conversation.
    async fn lock_issue(&self, number: u64) -> AppResult<()>;

    /// Creates a release.
    async fn create_release(&self, release: &NewRelease) -> AppResult<ReleaseInfo>;

    /// Reports a commit status.
    async fn create_status(&self, status: &StatusUpdate) -> AppResult<()>;
}
