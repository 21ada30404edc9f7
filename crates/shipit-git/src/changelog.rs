//! Changelog file writer.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use shipit_core::error::AppError;
use shipit_core::result::AppResult;
use shipit_core::traits::ChangelogWriter;

use crate::repo::GitRepo;

const TITLE: &str = "# Changelog";
const BOT_NAME: &str = "shipit[bot]";
const BOT_EMAIL: &str = "shipit[bot]@users.noreply.github.com";

/// Prepends release sections to a changelog file and commits it.
#[derive(Debug, Clone)]
pub struct FileChangelog {
    repo: GitRepo,
    path: PathBuf,
}

impl FileChangelog {
    /// Creates a writer for `path`, relative to the working tree root.
    pub fn new(repo: GitRepo, path: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            path: path.into(),
        }
    }

    /// Renders the section for one release.
    pub fn section(version: &str, notes: &str, date: &str) -> String {
        format!("## {version} ({date})\n\n{}\n", notes.trim_end())
    }

    /// Inserts `section` below the title of `existing`.
    pub fn prepend(existing: &str, section: &str) -> String {
        let body = existing
            .strip_prefix(TITLE)
            .map(|rest| rest.trim_start_matches('\n'))
            .unwrap_or(existing);

        if body.trim().is_empty() {
            format!("{TITLE}\n\n{section}")
        } else {
            format!("{TITLE}\n\n{section}\n{body}")
        }
    }

    /// Sets a committer identity when none is configured. Failures are
    /// logged and ignored; the commit reports its own error.
    async fn ensure_identity(&self) {
        for (key, value) in [("user.name", BOT_NAME), ("user.email", BOT_EMAIL)] {
            match self.repo.try_run(&["config", key]).await {
                Ok(Some(current)) if !current.trim().is_empty() => continue,
                Ok(_) => {}
                Err(e) => {
                    warn!(key = key, error = %e.message, "Could not read git identity");
                    continue;
                }
            }

            if let Err(e) = self.repo.run(&["config", key, value]).await {
                warn!(key = key, error = %e.message, "Could not set git identity");
            }
        }
    }
}

#[async_trait]
impl ChangelogWriter for FileChangelog {
    async fn commit_changelog(&self, version: &str, notes: &str) -> AppResult<()> {
        let file = self.repo.path().join(&self.path);
        let existing = match tokio::fs::read_to_string(&file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let date = Utc::now().format("%Y-%m-%d").to_string();
        let content = Self::prepend(&existing, &Self::section(version, notes, &date));
        tokio::fs::write(&file, content).await?;

        let relative = self
            .path
            .to_str()
            .ok_or_else(|| AppError::validation("Changelog path is not valid UTF-8"))?;

        self.ensure_identity().await;
        self.repo.run(&["add", relative]).await?;
        self.repo
            .run(&[
                "commit",
                "-m",
                &format!("Update {relative} [skip ci]"),
                "--no-verify",
            ])
            .await?;

        info!(version = %version, path = %relative, "Committed changelog");
        Ok(())
    }
}
