//! Shared test helpers for integration tests.

use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use shipit::{BootstrapOptions, CiContext, Plugin, ReleaseHooks, ShipitConfig, Shipit};
use shipit_core::AppError;
use shipit_core::result::AppResult;
use shipit_core::types::ReleaseContext;
use shipit_plugin::{CanaryArgs, CanaryOutcome, PublishedRelease, ShipResult};
use shipit_release::testing::MemoryHost;

/// Run git in `path`, panicking on failure.
pub fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Test repository with a released history and an in-memory host
pub struct TestApp {
    _root: TempDir,
    /// Working tree
    pub path: std::path::PathBuf,
    /// Hosting platform
    pub host: Arc<MemoryHost>,
}

impl TestApp {
    /// Create a repository whose latest release is `v1.2.3`
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path = root.path().to_path_buf();

        git(&path, &["init", "--initial-branch=main"]);
        git(&path, &["config", "user.name", "Test User"]);
        git(&path, &["config", "user.email", "test@example.com"]);

        let app = Self {
            _root: root,
            path,
            host: Arc::new(MemoryHost::default()),
        };
        app.commit("Initial commit");
        git(&app.path, &["tag", "v1.2.3"]);
        app
    }

    /// Commit a new file with `subject`
    pub fn commit(&self, subject: &str) {
        let count = git(&self.path, &["rev-list", "--all", "--count"])
            .trim()
            .parse::<u64>()
            .unwrap_or(0);
        std::fs::write(self.path.join(format!("file-{count}.txt")), subject)
            .expect("Failed to write file");
        git(&self.path, &["add", "."]);
        git(&self.path, &["commit", "-m", subject]);
    }

    /// Squash-merge request `number` with `labels` and description `body`
    pub fn merge_request(&self, number: u64, title: &str, labels: &[&str], body: &str) {
        self.commit(&format!("{title} (#{number})"));
        let mut state = self.host.state.lock().unwrap();
        state.requests.insert(
            number,
            shipit_core::types::Request {
                number,
                title: title.to_string(),
                body: Some(body.to_string()),
                head_sha: format!("{number:07}"),
            },
        );
        state
            .labels
            .insert(number, labels.iter().map(|l| l.to_string()).collect());
    }

    /// Subjects of the most recent `n` commits, newest first
    pub fn recent_subjects(&self, n: usize) -> Vec<String> {
        git(&self.path, &["log", &format!("-{n}"), "--format=%s"])
            .lines()
            .map(String::from)
            .collect()
    }

    /// Configuration for the test repository
    pub fn config(&self) -> ShipitConfig {
        ShipitConfig::new("acme", "widgets").with_token("test-token")
    }

    /// Build the orchestrator on `branch` with extra plugins
    pub async fn shipit(
        &self,
        config: ShipitConfig,
        ci: CiContext,
        plugins: Vec<Arc<dyn Plugin>>,
    ) -> Shipit {
        shipit::bootstrap(
            config,
            self.host.clone(),
            BootstrapOptions {
                repo_path: Some(self.path.clone()),
                ci: Some(ci),
                plugins,
            },
        )
        .await
        .expect("Failed to bootstrap")
    }
}

/// Ordered record of hook invocations
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Plugin standing in for a package registry
#[derive(Debug)]
pub struct RegistryPlugin {
    /// Invocations, in order
    pub journal: Journal,
    /// Fail the publish step with this message
    pub fail_publish: Option<String>,
    /// Answer canary requests
    pub canary: bool,
}

impl RegistryPlugin {
    /// A registry that publishes everything
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail_publish: None,
            canary: true,
        }
    }
}

impl Plugin for RegistryPlugin {
    fn name(&self) -> &str {
        "registry"
    }

    fn apply(&self, hooks: &mut ReleaseHooks) -> AppResult<()> {
        let journal = self.journal.clone();
        hooks.version.tap_fn("registry", move |ctx: ReleaseContext| {
            let journal = journal.clone();
            async move {
                journal
                    .lock()
                    .unwrap()
                    .push(format!("version {}", ctx.current_version));
                Ok(())
            }
        })?;

        let journal = self.journal.clone();
        hooks
            .after_version
            .tap_fn("registry", move |ctx: ReleaseContext| {
                let journal = journal.clone();
                async move {
                    journal
                        .lock()
                        .unwrap()
                        .push(format!("after_version {}", ctx.current_version));
                    Ok(())
                }
            })?;

        let journal = self.journal.clone();
        let failure = self.fail_publish.clone();
        hooks.publish.tap_fn("registry", move |ctx: ReleaseContext| {
            let journal = journal.clone();
            let failure = failure.clone();
            async move {
                journal
                    .lock()
                    .unwrap()
                    .push(format!("publish {}", ctx.current_version));
                match failure {
                    Some(message) => Err(AppError::internal(message)),
                    None => Ok(()),
                }
            }
        })?;

        let journal = self.journal.clone();
        hooks
            .after_publish
            .tap_fn("registry", move |ctx: ReleaseContext| {
                let journal = journal.clone();
                async move {
                    journal
                        .lock()
                        .unwrap()
                        .push(format!("after_publish {}", ctx.current_version));
                    Ok(())
                }
            })?;

        let journal = self.journal.clone();
        hooks
            .after_release
            .tap_fn("registry", move |release: PublishedRelease| {
                let journal = journal.clone();
                async move {
                    journal
                        .lock()
                        .unwrap()
                        .push(format!("after_release {}", release.version));
                    Ok(())
                }
            })?;

        if self.canary {
            let journal = self.journal.clone();
            hooks.canary.tap_fn("registry", move |args: CanaryArgs| {
                let journal = journal.clone();
                async move {
                    let version = format!("{}-canary{}", args.next_version, args.canary_identifier);
                    journal.lock().unwrap().push(format!("canary {version}"));
                    Ok(Some(CanaryOutcome::Published(version)))
                }
            })?;
        }

        let journal = self.journal.clone();
        hooks.after_ship.tap("registry", move |result: &ShipResult| {
            journal
                .lock()
                .unwrap()
                .push(format!("after_ship {:?}", result.version));
            Ok(())
        })?;

        Ok(())
    }
}

/// Entries recorded so far
pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}
