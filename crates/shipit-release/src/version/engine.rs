//! Per-commit bump resolution followed by max-aggregation.
//!
//! Each commit resolves to its own bump kind by scanning the label map from
//! highest to lowest precedence. The release bump is the maximum across
//! commits. A `skip` label only caps the commit carrying it; it never vetoes
//! other commits in the range.

use std::sync::Arc;

use tracing::{debug, info};

use shipit_core::result::AppResult;
use shipit_core::traits::CommitLog;
use shipit_core::types::{BumpKind, Commit, LabelBumpMap};

/// Commits in a range together with the bump they warrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpComputation {
    /// Commits in the range, oldest first.
    pub commits: Vec<Commit>,
    /// Release bump, or `None` when no release is warranted.
    pub bump: Option<BumpKind>,
}

/// Aggregates per-commit bumps; `None` when the range warrants no release.
pub fn aggregate_bump(labels: &LabelBumpMap, commits: &[Commit]) -> Option<BumpKind> {
    commits
        .iter()
        .map(|commit| labels.resolve(&commit.labels))
        .max()
        .filter(BumpKind::is_release)
}

/// Applies `bump` to `last` (an optionally `v`-prefixed semver) and renders
/// the result with `prefix`.
pub fn next_version(last: &str, bump: BumpKind, prefix: &str) -> AppResult<String> {
    let bare = last.trim().trim_start_matches('v');
    let current = semver::Version::parse(bare)?;
    Ok(format!("{prefix}{}", bump.apply(&current)))
}

/// Computes release bumps from the commit log.
#[derive(Clone)]
pub struct VersionEngine {
    commit_log: Arc<dyn CommitLog>,
    labels: LabelBumpMap,
}

impl VersionEngine {
    /// Creates a new engine.
    pub fn new(commit_log: Arc<dyn CommitLog>, labels: LabelBumpMap) -> Self {
        Self { commit_log, labels }
    }

    /// Returns the label map in use.
    pub fn labels(&self) -> &LabelBumpMap {
        &self.labels
    }

    /// Bump kind of a single commit.
    pub fn commit_bump(&self, commit: &Commit) -> BumpKind {
        self.labels.resolve(&commit.labels)
    }

    /// Start of the release range: the latest release, or the first commit
    /// when nothing has been released yet.
    pub async fn range_start(&self) -> AppResult<String> {
        match self.commit_log.latest_release_ref().await? {
            Some(reference) => Ok(reference),
            None => {
                debug!("No previous release found, using first commit");
                self.commit_log.first_commit_ref().await
            }
        }
    }

    /// Computes the commits and bump between `last_release_ref` (exclusive)
    /// and `up_to` (inclusive, default HEAD).
    pub async fn compute(
        &self,
        last_release_ref: &str,
        up_to: Option<&str>,
    ) -> AppResult<BumpComputation> {
        let commits = self
            .commit_log
            .commits_between(last_release_ref, up_to)
            .await?;

        for commit in &commits {
            debug!(
                sha = %commit.short_sha(),
                bump = %self.commit_bump(commit),
                "Resolved commit bump"
            );
        }

        let bump = aggregate_bump(&self.labels, &commits);
        info!(
            from = %last_release_ref,
            to = %up_to.unwrap_or("HEAD"),
            commits = commits.len(),
            bump = %bump.map(|b| b.as_str()).unwrap_or("none"),
            "Computed release bump"
        );

        Ok(BumpComputation { commits, bump })
    }

    /// Computes only the bump for a range.
    pub async fn compute_bump(
        &self,
        last_release_ref: &str,
        up_to: Option<&str>,
    ) -> AppResult<Option<BumpKind>> {
        Ok(self.compute(last_release_ref, up_to).await?.bump)
    }
}

impl std::fmt::Debug for VersionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionEngine")
            .field("labels", &self.labels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedLog(Vec<Commit>);

    #[async_trait]
    impl CommitLog for FixedLog {
        async fn commits_between(&self, _from: &str, _to: Option<&str>) -> AppResult<Vec<Commit>> {
            Ok(self.0.clone())
        }

        async fn latest_release_ref(&self) -> AppResult<Option<String>> {
            Ok(None)
        }

        async fn first_commit_ref(&self) -> AppResult<String> {
            Ok("root".to_string())
        }

        async fn current_head_short_sha(&self) -> AppResult<String> {
            Ok("abc1234".to_string())
        }
    }

    fn commit(labels: &[&str]) -> Commit {
        Commit::new("0000000000", "change").with_labels(labels.iter().copied())
    }

    fn engine(commits: Vec<Commit>) -> VersionEngine {
        VersionEngine::new(Arc::new(FixedLog(commits)), LabelBumpMap::default())
    }

    #[tokio::test]
    async fn test_patch_and_minor_yield_minor() {
        let engine = engine(vec![commit(&["patch"]), commit(&["minor"])]);
        let bump = engine.compute_bump("v1.0.0", None).await.unwrap();
        assert_eq!(bump, Some(BumpKind::Minor));
    }

    #[tokio::test]
    async fn test_one_major_among_patches() {
        let mut commits = vec![commit(&["patch"]); 5];
        commits.push(commit(&["major"]));
        let bump = engine(commits).compute_bump("v1.0.0", None).await.unwrap();
        assert_eq!(bump, Some(BumpKind::Major));
    }

    #[tokio::test]
    async fn test_empty_range_warrants_no_release() {
        let bump = engine(vec![]).compute_bump("v1.0.0", None).await.unwrap();
        assert_eq!(bump, None);
    }

    #[tokio::test]
    async fn test_unlabelled_and_skipped_warrant_no_release() {
        let engine = engine(vec![commit(&[]), commit(&["skip-release"]), commit(&["docs"])]);
        assert_eq!(engine.compute_bump("v1.0.0", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_skip_does_not_veto_other_commits() {
        let engine = engine(vec![commit(&["skip-release"]), commit(&["patch"])]);
        assert_eq!(
            engine.compute_bump("v1.0.0", None).await.unwrap(),
            Some(BumpKind::Patch)
        );
    }

    #[tokio::test]
    async fn test_skip_caps_only_its_own_commit() {
        let engine = engine(vec![commit(&["skip-release", "docs"])]);
        assert_eq!(engine.commit_bump(&commit(&["skip-release", "minor"])), BumpKind::Minor);
        assert_eq!(engine.compute_bump("v1.0.0", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_range_start_falls_back_to_first_commit() {
        assert_eq!(engine(vec![]).range_start().await.unwrap(), "root");
    }

    #[test]
    fn test_compute_is_deterministic() {
        let map = LabelBumpMap::default();
        let commits = vec![commit(&["minor"]), commit(&["patch"]), commit(&["x"])];
        let first = aggregate_bump(&map, &commits);
        for _ in 0..10 {
            assert_eq!(aggregate_bump(&map, &commits), first);
        }
    }

    #[test]
    fn test_next_version_keeps_prefix_choice() {
        assert_eq!(next_version("v1.2.3", BumpKind::Minor, "v").unwrap(), "v1.3.0");
        assert_eq!(next_version("1.2.3", BumpKind::Major, "").unwrap(), "2.0.0");
        assert_eq!(next_version("0.0.0", BumpKind::Patch, "v").unwrap(), "v0.0.1");
        assert!(next_version("release-12", BumpKind::Patch, "v").is_err());
    }
}
