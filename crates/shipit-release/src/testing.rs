//! In-memory hosting client for tests.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for dependents.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use shipit_core::error::AppError;
use shipit_core::result::AppResult;
use shipit_core::traits::HostingClient;
use shipit_core::types::{Comment, Commit, NewRelease, ReleaseInfo, Request, StatusUpdate};

/// Everything the in-memory host has recorded.
#[derive(Debug, Default)]
pub struct HostState {
    pub requests: HashMap<u64, Request>,
    pub request_commits: HashMap<u64, Vec<Commit>>,
    pub labels: HashMap<u64, Vec<String>>,
    pub comments: HashMap<u64, Vec<Comment>>,
    pub locked: Vec<u64>,
    pub releases: Vec<NewRelease>,
    pub statuses: Vec<StatusUpdate>,
    pub mutations: usize,
    pub next_id: u64,
}

/// [`HostingClient`] that keeps requests, labels, comments, and releases in
/// memory and counts every mutation.
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub state: Mutex<HostState>,
}

impl MemoryHost {
    /// Adds a request with the given description and commits.
    pub fn with_request(self, number: u64, body: &str, commits: Vec<Commit>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.requests.insert(
                number,
                Request {
                    number,
                    title: format!("Request {number}"),
                    body: Some(body.to_string()),
                    head_sha: "f00dfeed".to_string(),
                },
            );
            state.request_commits.insert(number, commits);
        }
        self
    }

    /// Comments on a request or issue.
    pub fn comments(&self, number: u64) -> Vec<Comment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    /// Labels on a request or issue.
    pub fn labels_of(&self, number: u64) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .labels
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of mutating calls received.
    pub fn mutations(&self) -> usize {
        self.state.lock().unwrap().mutations
    }

    /// Releases created so far.
    pub fn releases(&self) -> Vec<NewRelease> {
        self.state.lock().unwrap().releases.clone()
    }

    /// Issues locked so far.
    pub fn locked(&self) -> Vec<u64> {
        self.state.lock().unwrap().locked.clone()
    }

    /// Statuses reported so far.
    pub fn statuses(&self) -> Vec<StatusUpdate> {
        self.state.lock().unwrap().statuses.clone()
    }
}

#[async_trait]
impl HostingClient for MemoryHost {
    async fn get_request(&self, number: u64) -> AppResult<Request> {
        self.state
            .lock()
            .unwrap()
            .requests
            .get(&number)
            .cloned()
            .ok_or_else(|| AppError::platform(404, format!("Request {number} not found")))
    }

    async fn get_commits_for_request(&self, number: u64) -> AppResult<Vec<Commit>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .request_commits
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_labels(&self, number: u64) -> AppResult<Vec<String>> {
        Ok(self.labels_of(number))
    }

    async fn add_label(&self, number: u64, label: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        state
            .labels
            .entry(number)
            .or_default()
            .push(label.to_string());
        Ok(())
    }

    async fn list_comments(&self, number: u64) -> AppResult<Vec<Comment>> {
        Ok(self.comments(number))
    }

    async fn create_comment(&self, number: u64, body: &str) -> AppResult<Comment> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        state.next_id += 1;
        let comment = Comment {
            id: state.next_id,
            body: body.to_string(),
        };
        state
            .comments
            .entry(number)
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn edit_comment(&self, number: u64, comment_id: u64, body: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        let comment = state
            .comments
            .get_mut(&number)
            .and_then(|c| c.iter_mut().find(|c| c.id == comment_id))
            .ok_or_else(|| AppError::platform(404, "Comment not found"))?;
        comment.body = body.to_string();
        Ok(())
    }

    async fn delete_comment(&self, number: u64, comment_id: u64) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        if let Some(comments) = state.comments.get_mut(&number) {
            comments.retain(|c| c.id != comment_id);
        }
        Ok(())
    }

    async fn lock_issue(&self, number: u64) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        state.locked.push(number);
        Ok(())
    }

    async fn create_release(&self, release: &NewRelease) -> AppResult<ReleaseInfo> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        state.releases.push(release.clone());
        Ok(ReleaseInfo {
            id: state.releases.len() as u64,
            tag: release.tag.clone(),
            url: format!("https://example.test/releases/{}", release.tag),
        })
    }

    async fn create_status(&self, status: &StatusUpdate) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        state.statuses.push(status.clone());
        Ok(())
    }
}
