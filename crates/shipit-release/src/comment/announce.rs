//! Release announcement: comments, labels, and issue locks for everything a
//! release shipped.

use std::sync::Arc;

use tracing::{debug, info};

use shipit_core::result::AppResult;
use shipit_core::traits::HostingClient;
use shipit_core::types::Commit;

use super::issues::closing_issue_numbers;
use super::manager::CommentManager;

/// Comment context of release announcements.
pub const RELEASE_CONTEXT: &str = "released";

/// Comment context of canary announcements.
pub const CANARY_CONTEXT: &str = "canary-version";

/// Announces releases on the requests and issues they shipped.
#[derive(Clone)]
pub struct Announcer {
    comments: CommentManager,
    client: Arc<dyn HostingClient>,
    released_label: String,
    lock_issues: bool,
}

impl Announcer {
    /// Creates a new announcer.
    pub fn new(
        client: Arc<dyn HostingClient>,
        released_label: impl Into<String>,
        lock_issues: bool,
        dry_run: bool,
    ) -> Self {
        Self {
            comments: CommentManager::new(Arc::clone(&client), dry_run),
            client,
            released_label: released_label.into(),
            lock_issues,
        }
    }

    /// Comments on and labels every request in `commits` and every issue
    /// those requests close; issues are locked when configured.
    pub async fn announce_release(&self, version: &str, commits: &[Commit]) -> AppResult<()> {
        let requests = request_numbers(commits);
        info!(version = %version, requests = requests.len(), "Announcing release");

        for number in requests {
            self.comments
                .upsert_comment(
                    &format!(":rocket: PR was released in {version} :rocket:"),
                    number,
                    RELEASE_CONTEXT,
                    false,
                )
                .await?;
            self.comments
                .ensure_label(number, &self.released_label)
                .await?;

            for issue in self.closed_issues(number).await? {
                self.comments
                    .upsert_comment(
                        &format!(":rocket: Issue was released in {version} :rocket:"),
                        issue,
                        RELEASE_CONTEXT,
                        false,
                    )
                    .await?;
                self.comments
                    .ensure_label(issue, &self.released_label)
                    .await?;

                if self.lock_issues {
                    if self.comments.is_dry_run() {
                        info!(issue, "Dry run: would have locked issue");
                    } else {
                        self.client.lock_issue(issue).await?;
                        info!(issue, "Locked issue");
                    }
                }
            }
        }
        Ok(())
    }

    /// Comments the canary version on the request it was built for, or on
    /// the requests in `commits` when none is known. Never labels or locks.
    pub async fn announce_canary(
        &self,
        version: &str,
        request_number: Option<u64>,
        commits: &[Commit],
    ) -> AppResult<()> {
        let requests = match request_number {
            Some(number) => vec![number],
            None => request_numbers(commits),
        };
        info!(version = %version, requests = requests.len(), "Announcing canary");

        for number in requests {
            self.comments
                .upsert_comment(
                    &format!(":package: Published canary version `{version}`"),
                    number,
                    CANARY_CONTEXT,
                    true,
                )
                .await?;
        }
        Ok(())
    }

    /// Issues a request closes, from its description and its own commits.
    async fn closed_issues(&self, number: u64) -> AppResult<Vec<u64>> {
        let request = self.client.get_request(number).await?;
        let commits = self.client.get_commits_for_request(number).await?;

        let mut issues = closing_issue_numbers(request.body.as_deref().unwrap_or_default());
        for commit in &commits {
            for issue in closing_issue_numbers(&commit.message) {
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
        }
        issues.retain(|issue| *issue != number);

        debug!(request = number, issues = ?issues, "Collected closed issues");
        Ok(issues)
    }
}

impl std::fmt::Debug for Announcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Announcer")
            .field("comments", &self.comments)
            .field("released_label", &self.released_label)
            .field("lock_issues", &self.lock_issues)
            .finish()
    }
}

/// Distinct request numbers in commit order.
fn request_numbers(commits: &[Commit]) -> Vec<u64> {
    let mut numbers = Vec::new();
    for number in commits.iter().filter_map(|c| c.request) {
        if !numbers.contains(&number) {
            numbers.push(number);
        }
    }
    numbers
}
