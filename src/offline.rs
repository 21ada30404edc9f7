//! Hosting client for runs without a platform binding.
//!
//! Reads answer as if the platform knew nothing: no labels and no comments.
//! Every call that needs the platform fails with a precondition error, so
//! dry runs work offline while live runs stop before their first mutation.

use async_trait::async_trait;
use tracing::debug;

use shipit_core::error::AppError;
use shipit_core::result::AppResult;
use shipit_core::traits::HostingClient;
use shipit_core::types::{Comment, Commit, NewRelease, ReleaseInfo, Request, StatusUpdate};

/// [`HostingClient`] used when no platform client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineHost;

impl OfflineHost {
    fn unavailable(operation: &str) -> AppError {
        AppError::precondition(format!(
            "Cannot {operation}: no hosting platform client is configured"
        ))
    }
}

#[async_trait]
impl HostingClient for OfflineHost {
    async fn get_request(&self, number: u64) -> AppResult<Request> {
        Err(Self::unavailable(&format!("read request #{number}")))
    }

    async fn get_commits_for_request(&self, number: u64) -> AppResult<Vec<Commit>> {
        Err(Self::unavailable(&format!("read commits of #{number}")))
    }

    async fn get_labels(&self, number: u64) -> AppResult<Vec<String>> {
        debug!(number, "Offline: no labels");
        Ok(Vec::new())
    }

    async fn add_label(&self, _number: u64, _label: &str) -> AppResult<()> {
        Err(Self::unavailable("add a label"))
    }

    async fn list_comments(&self, number: u64) -> AppResult<Vec<Comment>> {
        debug!(number, "Offline: no comments");
        Ok(Vec::new())
    }

    async fn create_comment(&self, _number: u64, _body: &str) -> AppResult<Comment> {
        Err(Self::unavailable("create a comment"))
    }

    async fn edit_comment(&self, _number: u64, _comment_id: u64, _body: &str) -> AppResult<()> {
        Err(Self::unavailable("edit a comment"))
    }

    async fn delete_comment(&self, _number: u64, _comment_id: u64) -> AppResult<()> {
        Err(Self::unavailable("delete a comment"))
    }

    async fn lock_issue(&self, _number: u64) -> AppResult<()> {
        Err(Self::unavailable("lock an issue"))
    }

    async fn create_release(&self, _release: &NewRelease) -> AppResult<ReleaseInfo> {
        Err(Self::unavailable("create a release"))
    }

    async fn create_status(&self, _status: &StatusUpdate) -> AppResult<()> {
        Err(Self::unavailable("report a status"))
    }
}
