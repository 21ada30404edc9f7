//! Commit log read from git history.
//!
//! Commits are listed oldest first. The request a commit was merged through
//! is recovered from its message: a GitHub merge commit
//! (`Merge pull request #12 from ...`), a squash commit (`Add thing (#12)`),
//! or a GitLab merge commit whose body ends with
//! `See merge request group/project!12`. The request's labels are fetched
//! from the hosting platform.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use shipit_core::result::AppResult;
use shipit_core::traits::{CommitLog, HostingClient};
use shipit_core::types::Commit;

use crate::repo::GitRepo;

const FIELD: char = '\u{1f}';
const RECORD: char = '\u{1e}';

static MERGE_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Merge pull request #(\d+)").expect("valid merge regex"));

static SQUASH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)\s*$").expect("valid squash regex"));

static MERGE_REQUEST_TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^See merge request \S*!(\d+)\s*$").expect("valid merge request regex")
});

/// Request number a commit message references, if any.
pub fn request_number(message: &str) -> Option<u64> {
    let subject = message.lines().next().unwrap_or_default();
    MERGE_SUBJECT
        .captures(subject)
        .or_else(|| SQUASH_SUFFIX.captures(subject))
        .or_else(|| MERGE_REQUEST_TRAILER.captures(message))
        .and_then(|caps| caps[1].parse().ok())
}

/// [`CommitLog`] over a git working tree.
pub struct GitCommitLog {
    repo: GitRepo,
    hosting: Option<Arc<dyn HostingClient>>,
}

impl GitCommitLog {
    /// Creates a log that leaves commit labels empty.
    pub fn new(repo: GitRepo) -> Self {
        Self {
            repo,
            hosting: None,
        }
    }

    /// Creates a log that labels commits from their requests.
    pub fn with_hosting(repo: GitRepo, hosting: Arc<dyn HostingClient>) -> Self {
        Self {
            repo,
            hosting: Some(hosting),
        }
    }

    async fn label(&self, commits: &mut [Commit]) -> AppResult<()> {
        let Some(hosting) = &self.hosting else {
            return Ok(());
        };

        let mut cache: HashMap<u64, Vec<String>> = HashMap::new();
        for commit in commits.iter_mut() {
            let Some(number) = commit.request else {
                continue;
            };
            if !cache.contains_key(&number) {
                let labels = hosting.get_labels(number).await?;
                debug!(request = number, labels = ?labels, "Fetched request labels");
                cache.insert(number, labels);
            }
            if let Some(labels) = cache.get(&number) {
                commit.labels.extend(labels.iter().cloned());
            }
        }
        Ok(())
    }
}

/// Parses `git log --format=%H%x1f%B%x1e` output.
fn parse_log(output: &str) -> Vec<Commit> {
    output
        .split(RECORD)
        .filter_map(|record| {
            let record = record.trim_start_matches('\n');
            let (sha, message) = record.split_once(FIELD)?;
            let sha = sha.trim();
            if sha.is_empty() {
                return None;
            }
            let commit = Commit::new(sha, message.trim());
            Some(match request_number(&commit.message) {
                Some(number) => commit.with_request(number),
                None => commit,
            })
        })
        .collect()
}

#[async_trait]
impl CommitLog for GitCommitLog {
    async fn commits_between(&self, from: &str, to: Option<&str>) -> AppResult<Vec<Commit>> {
        let range = format!("{from}..{}", to.unwrap_or("HEAD"));
        let output = self
            .repo
            .run(&["log", "--reverse", "--format=%H%x1f%B%x1e", &range])
            .await?;

        let mut commits = parse_log(&output);
        self.label(&mut commits).await?;
        Ok(commits)
    }

    async fn latest_release_ref(&self) -> AppResult<Option<String>> {
        let tag = self
            .repo
            .try_run(&["describe", "--tags", "--abbrev=0", "HEAD"])
            .await?;
        Ok(tag.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
    }

    async fn first_commit_ref(&self) -> AppResult<String> {
        let output = self
            .repo
            .run(&["rev-list", "--max-parents=0", "HEAD"])
            .await?;
        output
            .lines()
            .next()
            .map(|sha| sha.trim().to_string())
            .ok_or_else(|| shipit_core::AppError::git("Repository has no commits"))
    }

    async fn current_head_short_sha(&self) -> AppResult<String> {
        let output = self.repo.run(&["rev-parse", "--short", "HEAD"]).await?;
        Ok(output.trim().to_string())
    }
}

impl std::fmt::Debug for GitCommitLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCommitLog")
            .field("repo", &self.repo)
            .field("labelled", &self.hosting.is_some())
            .finish()
    }
}
