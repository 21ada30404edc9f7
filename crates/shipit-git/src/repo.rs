//! Thin async wrapper over the system `git` binary.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use shipit_core::error::AppError;
use shipit_core::result::AppResult;

/// A working tree driven through `git -C <path>`.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Opens the repository containing `path`.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let repo = Self {
            path: path.as_ref().to_path_buf(),
        };
        let top = repo.run(&["rev-parse", "--show-toplevel"]).await?;
        Ok(Self {
            path: PathBuf::from(top.trim()),
        })
    }

    /// Working tree root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs git and returns stdout, failing on a non-zero exit.
    pub async fn run(&self, args: &[&str]) -> AppResult<String> {
        let output = self.command(args).output().await.map_err(|e| {
            AppError::with_source(
                shipit_core::ErrorKind::Git,
                "Failed to execute git",
                e,
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::git(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs git and returns stdout, or `None` on a non-zero exit.
    pub async fn try_run(&self, args: &[&str]) -> AppResult<Option<String>> {
        match self.run(args).await {
            Ok(stdout) => Ok(Some(stdout)),
            Err(e) if e.is(shipit_core::ErrorKind::Git) && e.source.is_none() => {
                debug!(args = ?args, error = %e.message, "git exited unsuccessfully");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.path);
        cmd.arg("-c").arg("core.quotePath=false");
        cmd.arg("-c").arg("advice.detachedHead=false");
        cmd.args(args);
        cmd.kill_on_drop(true);
        cmd
    }
}
