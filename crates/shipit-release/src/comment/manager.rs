//! Tracked comments and labels.
//!
//! A tracked comment carries a hidden marker naming its context. At most one
//! tracked comment exists per `(number, context)`: every mutation looks the
//! marker up first and converges on a single comment.

use std::sync::Arc;

use tracing::{debug, info};

use shipit_core::result::AppResult;
use shipit_core::traits::HostingClient;
use shipit_core::types::Comment;

/// Hidden marker identifying a tracked comment's context.
pub fn context_marker(context: &str) -> String {
    format!("<!-- SHIPIT_COMMENT_CONTEXT: {context} -->")
}

/// Idempotent comment and label mutations on requests and issues.
#[derive(Clone)]
pub struct CommentManager {
    client: Arc<dyn HostingClient>,
    dry_run: bool,
}

impl CommentManager {
    /// Creates a new manager. In dry-run mode mutations are only logged.
    pub fn new(client: Arc<dyn HostingClient>, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Returns whether mutations are suppressed.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Tracked comments for a context, oldest first.
    pub async fn find_tracked(&self, number: u64, context: &str) -> AppResult<Vec<Comment>> {
        let marker = context_marker(context);
        let comments = self.client.list_comments(number).await?;
        Ok(comments
            .into_iter()
            .filter(|comment| comment.body.contains(&marker))
            .collect())
    }

    /// Creates or replaces the tracked comment for `(number, context)`.
    ///
    /// With `edit` the existing comment is updated in place; without it the
    /// old comment is deleted and a new one created so it appears last in
    /// the thread.
    pub async fn upsert_comment(
        &self,
        message: &str,
        number: u64,
        context: &str,
        edit: bool,
    ) -> AppResult<()> {
        let body = format!("{}\n{}", context_marker(context), message);
        let marker = context_marker(context);
        let thread = self.client.list_comments(number).await?;
        let last_id = thread.last().map(|comment| comment.id);
        let tracked: Vec<Comment> = thread
            .into_iter()
            .filter(|comment| comment.body.contains(&marker))
            .collect();

        if self.dry_run {
            info!(
                number,
                context = %context,
                existing = tracked.len(),
                "Dry run: would have commented"
            );
            return Ok(());
        }

        match tracked.split_first() {
            Some((first, rest)) if edit => {
                for stale in rest {
                    self.client.delete_comment(number, stale.id).await?;
                }
                if first.body == body {
                    debug!(number, context = %context, "Tracked comment already up to date");
                } else {
                    self.client.edit_comment(number, first.id, &body).await?;
                    info!(number, context = %context, comment_id = first.id, "Edited comment");
                }
            }
            Some((only, [])) if only.body == body && Some(only.id) == last_id => {
                debug!(number, context = %context, "Tracked comment already last and up to date");
            }
            _ => {
                for stale in &tracked {
                    self.client.delete_comment(number, stale.id).await?;
                }
                let created = self.client.create_comment(number, &body).await?;
                info!(number, context = %context, comment_id = created.id, "Created comment");
            }
        }
        Ok(())
    }

    /// Removes the tracked comment for `(number, context)`, if any.
    pub async fn delete_comment(&self, number: u64, context: &str) -> AppResult<()> {
        let tracked = self.find_tracked(number, context).await?;
        if tracked.is_empty() {
            debug!(number, context = %context, "No tracked comment to delete");
            return Ok(());
        }

        if self.dry_run {
            info!(number, context = %context, "Dry run: would have deleted comment");
            return Ok(());
        }

        for comment in tracked {
            self.client.delete_comment(number, comment.id).await?;
            info!(number, context = %context, comment_id = comment.id, "Deleted comment");
        }
        Ok(())
    }

    /// Adds `label` unless already present. Returns whether it was added,
    /// or in dry-run mode whether it would have been.
    pub async fn ensure_label(&self, number: u64, label: &str) -> AppResult<bool> {
        let labels = self.client.get_labels(number).await?;
        if labels.iter().any(|existing| existing == label) {
            debug!(number, label = %label, "Label already present");
            return Ok(false);
        }

        if self.dry_run {
            info!(number, label = %label, "Dry run: would have added label");
            return Ok(true);
        }

        self.client.add_label(number, label).await?;
        info!(number, label = %label, "Added label");
        Ok(true)
    }
}

impl std::fmt::Debug for CommentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentManager")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryHost;

    fn manager(host: &Arc<MemoryHost>) -> CommentManager {
        CommentManager::new(Arc::clone(host) as Arc<dyn HostingClient>, false)
    }

    #[tokio::test]
    async fn test_upsert_twice_leaves_one_comment() {
        let host = Arc::new(MemoryHost::default());
        let comments = manager(&host);

        comments.upsert_comment("hello", 5, "ci", false).await.unwrap();
        comments.upsert_comment("hello", 5, "ci", false).await.unwrap();

        let tracked = comments.find_tracked(5, "ci").await.unwrap();
        assert_eq!(tracked.len(), 1);
        assert!(tracked[0].body.ends_with("hello"));
    }

    #[tokio::test]
    async fn test_upsert_without_edit_moves_comment_last() {
        let host = Arc::new(MemoryHost::default());
        let comments = manager(&host);

        comments.upsert_comment("first", 5, "ci", false).await.unwrap();
        host.create_comment(5, "a human reply").await.unwrap();
        comments.upsert_comment("second", 5, "ci", false).await.unwrap();

        let all = host.comments(5);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].body, "a human reply");
        assert!(all[1].body.ends_with("second"));
    }

    #[tokio::test]
    async fn test_upsert_with_edit_updates_in_place() {
        let host = Arc::new(MemoryHost::default());
        let comments = manager(&host);

        comments.upsert_comment("first", 5, "ci", true).await.unwrap();
        let original = host.comments(5)[0].id;
        host.create_comment(5, "a human reply").await.unwrap();
        comments.upsert_comment("second", 5, "ci", true).await.unwrap();

        let all = host.comments(5);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, original);
        assert!(all[0].body.ends_with("second"));
    }

    #[tokio::test]
    async fn test_edit_with_same_body_is_noop() {
        let host = Arc::new(MemoryHost::default());
        let comments = manager(&host);

        comments.upsert_comment("same", 5, "ci", true).await.unwrap();
        let before = host.mutations();
        comments.upsert_comment("same", 5, "ci", true).await.unwrap();
        assert_eq!(host.mutations(), before);
    }

    #[tokio::test]
    async fn test_repost_of_last_comment_is_noop() {
        let host = Arc::new(MemoryHost::default());
        let comments = manager(&host);

        comments.upsert_comment("same", 5, "ci", false).await.unwrap();
        let before = host.mutations();
        comments.upsert_comment("same", 5, "ci", false).await.unwrap();
        assert_eq!(host.mutations(), before);
    }

    #[tokio::test]
    async fn test_contexts_are_independent() {
        let host = Arc::new(MemoryHost::default());
        let comments = manager(&host);

        comments.upsert_comment("a", 5, "released", false).await.unwrap();
        comments.upsert_comment("b", 5, "released-canary", false).await.unwrap();
        assert_eq!(host.comments(5).len(), 2);

        comments.delete_comment(5, "released").await.unwrap();
        let left = host.comments(5);
        assert_eq!(left.len(), 1);
        assert!(left[0].body.ends_with('b'));
    }

    #[tokio::test]
    async fn test_duplicate_tracked_comments_are_collapsed() {
        let host = Arc::new(MemoryHost::default());
        let marker = context_marker("ci");
        host.create_comment(5, &format!("{marker}\nold 1")).await.unwrap();
        host.create_comment(5, &format!("{marker}\nold 2")).await.unwrap();

        manager(&host).upsert_comment("new", 5, "ci", true).await.unwrap();

        let all = host.comments(5);
        assert_eq!(all.len(), 1);
        assert!(all[0].body.ends_with("new"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let host = Arc::new(MemoryHost::default());
        manager(&host).delete_comment(9, "ci").await.unwrap();
        assert_eq!(host.mutations(), 0);
    }

    #[tokio::test]
    async fn test_ensure_label_never_duplicates() {
        let host = Arc::new(MemoryHost::default());
        let comments = manager(&host);

        assert!(comments.ensure_label(5, "released").await.unwrap());
        for _ in 0..3 {
            assert!(!comments.ensure_label(5, "released").await.unwrap());
        }
        assert_eq!(host.labels_of(5), vec!["released".to_string()]);
    }

    #[tokio::test]
    async fn test_dry_run_mutates_nothing() {
        let host = Arc::new(MemoryHost::default());
        let comments = CommentManager::new(Arc::clone(&host) as Arc<dyn HostingClient>, true);

        comments.upsert_comment("hello", 5, "ci", false).await.unwrap();
        comments.ensure_label(5, "released").await.unwrap();
        comments.delete_comment(5, "ci").await.unwrap();
        assert_eq!(host.mutations(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_reports_would_be_label() {
        let host = Arc::new(MemoryHost::default());
        host.add_label(5, "minor").await.unwrap();
        let comments = CommentManager::new(Arc::clone(&host) as Arc<dyn HostingClient>, true);

        assert!(comments.ensure_label(5, "released").await.unwrap());
        assert!(!comments.ensure_label(5, "minor").await.unwrap());
        assert_eq!(host.labels_of(5), vec!["minor".to_string()]);
    }
}
