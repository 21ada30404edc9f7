//! The release orchestrator.
//!
//! `Shipit` owns the validated configuration, the loaded hooks, and the
//! collaborators the workflow talks to. Every command honors `dry_run`:
//! a dry run computes and reports but never mutates the repository, the
//! hosting platform, or a registry.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use shipit_core::config::ShipitConfig;
use shipit_core::error::AppError;
use shipit_core::result::AppResult;
use shipit_core::traits::{ChangelogGenerator, ChangelogWriter, CommitLog, HostingClient};
use shipit_core::types::{
    BumpKind, CiContext, NewRelease, ReleaseContext, ReleaseInfo, StatusState, StatusUpdate,
};
use shipit_plugin::{
    CanaryArgs, CanaryOutcome, CanaryRelease, PreviousVersionArgs, PublishedRelease,
    ReleaseHooks, ShipResult,
};

use crate::canary::{build_canary_suffix, canary_version};
use crate::changelog::MarkdownChangelog;
use crate::comment::CommentManager;
use crate::version::{VersionEngine, next_version};

use super::options::{
    CanaryOptions, CanaryReport, CanaryStatus, CommentOptions, ShipOptions, ShipReport,
};
use super::state::{RunState, RunTrace};

/// Status context reported by `pr_check`.
pub const PR_CHECK_CONTEXT: &str = "shipit/pr-check";

/// Everything the orchestrator talks to besides the hooks.
pub struct Collaborators {
    /// Commit history provider.
    pub commit_log: Arc<dyn CommitLog>,
    /// Hosting platform client.
    pub hosting: Arc<dyn HostingClient>,
    /// Persists release notes.
    pub changelog_writer: Arc<dyn ChangelogWriter>,
    /// Renders release notes; defaults to [`MarkdownChangelog`].
    pub changelog_generator: Option<Arc<dyn ChangelogGenerator>>,
    /// Environment the run executes in.
    pub ci: CiContext,
}

/// Label-driven release orchestrator.
pub struct Shipit {
    config: ShipitConfig,
    hooks: Arc<ReleaseHooks>,
    versions: VersionEngine,
    commit_log: Arc<dyn CommitLog>,
    hosting: Arc<dyn HostingClient>,
    generator: Arc<dyn ChangelogGenerator>,
    writer: Arc<dyn ChangelogWriter>,
    ci: CiContext,
}

impl Shipit {
    /// Creates the orchestrator.
    ///
    /// Runs `modify_config` over the configuration, validates the result,
    /// and notifies `before_run`.
    pub fn new(
        config: ShipitConfig,
        hooks: Arc<ReleaseHooks>,
        collaborators: Collaborators,
    ) -> AppResult<Self> {
        let config = hooks.modify_config.waterfall(config)?;
        config.validate()?;
        let labels = config.label_map()?;

        hooks.before_run.call(&config)?;

        let generator = collaborators
            .changelog_generator
            .unwrap_or_else(|| Arc::new(MarkdownChangelog::new(labels.clone())));

        info!(
            owner = %config.owner,
            repo = %config.repo,
            base_branch = %config.base_branch,
            handlers = hooks.handler_count(),
            "Release orchestrator ready"
        );

        Ok(Self {
            versions: VersionEngine::new(collaborators.commit_log.clone(), labels),
            config,
            hooks,
            commit_log: collaborators.commit_log,
            hosting: collaborators.hosting,
            generator,
            writer: collaborators.changelog_writer,
            ci: collaborators.ci,
        })
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &ShipitConfig {
        &self.config
    }

    /// Returns the CI context.
    pub fn ci(&self) -> &CiContext {
        &self.ci
    }

    /// Returns a comment manager bound to the hosting client.
    pub fn comments(&self, dry_run: bool) -> CommentManager {
        CommentManager::new(self.hosting.clone(), dry_run)
    }

    /// Whether this build runs on the trunk branch.
    pub fn is_trunk(&self) -> bool {
        match self.ci.branch.as_deref() {
            Some(branch) => branch == self.config.base_branch,
            None => true,
        }
    }

    /// Bump the unreleased commits warrant, or `None` when no release is due.
    pub async fn version(&self) -> AppResult<Option<BumpKind>> {
        let from = self.versions.range_start().await?;
        self.versions.compute_bump(&from, None).await
    }

    /// Version the next release would get, or `None` when no release is due.
    pub async fn next_version(&self) -> AppResult<Option<String>> {
        let latest = self.commit_log.latest_release_ref().await?;
        let from = self.range_from(None, latest.as_deref()).await?;
        let Some(bump) = self.versions.compute_bump(&from, None).await? else {
            return Ok(None);
        };

        let last_release = self.previous_version(latest.as_deref()).await?;
        next_version(&last_release, bump, self.config.version_prefix()).map(Some)
    }

    /// Generates release notes and commits them to the changelog.
    ///
    /// Returns the notes, or `None` when the range warrants no release.
    pub async fn changelog(&self, opts: &ShipOptions) -> AppResult<Option<String>> {
        let Some(mut context) = self.draft(opts).await? else {
            return Ok(None);
        };

        if opts.dry_run {
            info!(version = %context.current_version, "Dry run: changelog not written");
            return Ok(Some(context.notes));
        }

        self.commit_changelog(&mut context).await?;
        Ok(Some(context.notes))
    }

    /// Creates the hosting release for the unreleased commits and fires
    /// `after_release`.
    pub async fn release(&self, opts: &ShipOptions) -> AppResult<Option<ReleaseInfo>> {
        let Some(context) = self.draft(opts).await? else {
            return Ok(None);
        };

        if opts.dry_run {
            info!(version = %context.current_version, "Dry run: release not created");
            return Ok(None);
        }

        self.publish_release(&context).await
    }

    /// Runs the full workflow.
    ///
    /// Trunk builds version, publish, and release; every other branch
    /// publishes a canary instead.
    pub async fn shipit(&self, opts: &ShipOptions) -> AppResult<ShipReport> {
        let mut trace = RunTrace::started();

        if !self.is_trunk() {
            info!(
                branch = ?self.ci.branch,
                base_branch = %self.config.base_branch,
                "Not on the base branch, publishing a canary"
            );
            return self.ship_canary(opts, trace).await;
        }

        let Some(mut context) = self.draft(opts).await? else {
            trace.enter(RunState::VersionComputed);
            info!("No release warranted by unreleased commits");
            trace.enter(RunState::Done);
            return Ok(ShipReport::empty(opts.dry_run, trace));
        };
        trace.enter(RunState::VersionComputed);

        if opts.dry_run {
            info!(
                version = %context.current_version,
                last_release = %context.last_release,
                bump = %context.bump,
                "Dry run: would have released"
            );
            trace.enter(RunState::Done);
            return Ok(ShipReport {
                version: Some(context.current_version),
                last_release: Some(context.last_release),
                bump: Some(context.bump),
                commits: context.commits,
                release: None,
                canary: None,
                dry_run: true,
                trace,
            });
        }

        self.commit_changelog(&mut context).await?;
        trace.enter(RunState::ChangelogGenerated);

        let context = context;
        self.hooks.version.parallel(&context).await?;
        self.hooks.after_version.parallel(&context).await?;
        self.hooks.publish.parallel(&context).await?;
        self.hooks.after_publish.parallel(&context).await?;
        trace.enter(RunState::Published);

        let release = self.publish_release(&context).await?;
        trace.enter(RunState::Released);

        self.hooks.after_ship.call(&ShipResult {
            version: Some(context.current_version.clone()),
            commits: context.commits.clone(),
            canary: false,
        })?;
        trace.enter(RunState::Done);

        Ok(ShipReport {
            version: Some(context.current_version),
            last_release: Some(context.last_release),
            bump: Some(context.bump),
            commits: context.commits,
            release,
            canary: None,
            dry_run: false,
            trace,
        })
    }

    /// Publishes a canary through the first `canary` handler that answers.
    ///
    /// A publisher reporting failure yields [`CanaryStatus::Failed`] rather
    /// than an error.
    pub async fn canary(&self, opts: &CanaryOptions) -> AppResult<CanaryReport> {
        let mut trace = RunTrace::started();
        self.run_canary(opts, &mut trace).await
    }

    async fn run_canary(
        &self,
        opts: &CanaryOptions,
        trace: &mut RunTrace,
    ) -> AppResult<CanaryReport> {
        if !self.hooks.canary.is_used() {
            return Err(AppError::precondition(
                "None of the loaded plugins can publish canaries",
            ));
        }

        let request_number = opts.request_number.or(self.ci.request_number);
        let build_id = opts.build_id.clone().or_else(|| self.ci.build_id.clone());

        let latest = self.commit_log.latest_release_ref().await?;
        let from = self.range_from(opts.from.as_deref(), latest.as_deref()).await?;
        let computation = self.versions.compute(&from, None).await?;
        let bump = computation.bump.unwrap_or(BumpKind::Patch);

        let last_release = self.previous_version(latest.as_deref()).await?;
        let next = next_version(&last_release, bump, self.config.version_prefix())?;
        let short_sha = self.commit_log.current_head_short_sha().await?;
        let suffix = build_canary_suffix(request_number, build_id.as_deref(), &short_sha);
        let would_be = canary_version(&next, &suffix);
        trace.enter(RunState::VersionComputed);

        if opts.dry_run {
            info!(version = %would_be, "Dry run: would have published canary");
            return Ok(CanaryReport {
                version: would_be,
                status: CanaryStatus::DryRun,
                bump,
                request_number,
                commits: computation.commits,
            });
        }

        let notes = self
            .generator
            .generate(&computation.commits, &last_release, bump);
        info!(version = %would_be, "Canary build: changelog not persisted");
        trace.enter(RunState::ChangelogGenerated);

        let args = CanaryArgs {
            bump,
            canary_identifier: suffix,
            next_version: next,
            notes,
            commits: computation.commits,
        };

        match self.hooks.canary.bail(&args).await? {
            Some(CanaryOutcome::Published(version)) => {
                info!(version = %version, request = ?request_number, "Published canary");
                let published = CanaryRelease {
                    version: version.clone(),
                    request_number,
                    commits: args.commits.clone(),
                };
                self.hooks.after_canary.parallel(&published).await?;
                trace.enter(RunState::CanaryPublished);

                Ok(CanaryReport {
                    version,
                    status: CanaryStatus::Published,
                    bump,
                    request_number,
                    commits: args.commits,
                })
            }
            Some(CanaryOutcome::Failed(message)) => {
                warn!(reason = %message, "Canary publisher reported a failure");
                Ok(CanaryReport {
                    version: would_be,
                    status: CanaryStatus::Failed(message),
                    bump,
                    request_number,
                    commits: args.commits,
                })
            }
            None => Err(AppError::precondition(
                "No canary publisher produced a version",
            )),
        }
    }

    /// Upserts or deletes a tracked comment.
    pub async fn comment(&self, opts: &CommentOptions) -> AppResult<()> {
        let number = self.require_number(opts.number)?;
        let comments = self.comments(opts.dry_run);

        if opts.delete {
            return comments.delete_comment(number, &opts.context).await;
        }

        let message = opts
            .message
            .as_deref()
            .ok_or_else(|| AppError::validation("A message is required unless deleting"))?;
        comments
            .upsert_comment(message, number, &opts.context, opts.edit)
            .await
    }

    /// Adds `label` to a request unless present. Returns whether it was added.
    pub async fn label(&self, number: Option<u64>, label: &str, dry_run: bool) -> AppResult<bool> {
        let number = self.require_number(number)?;
        self.comments(dry_run).ensure_label(number, label).await
    }

    /// Labels currently on a request.
    pub async fn labels(&self, number: Option<u64>) -> AppResult<Vec<String>> {
        let number = self.require_number(number)?;
        self.hosting.get_labels(number).await
    }

    /// Reports whether a request carries a usable release label.
    pub async fn pr_check(&self, number: Option<u64>, dry_run: bool) -> AppResult<StatusUpdate> {
        let number = self.require_number(number)?;
        let request = self.hosting.get_request(number).await?;
        let labels: BTreeSet<String> = self.hosting.get_labels(number).await?.into_iter().collect();

        let bump = self.versions.labels().resolve(&labels);
        let (state, description) = match bump {
            BumpKind::None => {
                let known: Vec<&str> = BumpKind::PRECEDENCE
                    .iter()
                    .flat_map(|kind| self.versions.labels().labels_for(*kind))
                    .collect();
                (
                    StatusState::Failure,
                    format!("No release label found, add one of: {}", known.join(", ")),
                )
            }
            BumpKind::Skip => (
                StatusState::Success,
                "Merging will not create a release".to_string(),
            ),
            kind => (
                StatusState::Success,
                format!("Merging will create a {kind} release"),
            ),
        };

        let status = StatusUpdate {
            sha: request.head_sha,
            state,
            context: PR_CHECK_CONTEXT.to_string(),
            description,
        };

        if dry_run {
            info!(request = number, state = ?status.state, "Dry run: status not reported");
        } else {
            self.hosting.create_status(&status).await?;
        }

        Ok(status)
    }

    async fn ship_canary(&self, opts: &ShipOptions, mut trace: RunTrace) -> AppResult<ShipReport> {
        let report = self
            .run_canary(
                &CanaryOptions {
                    dry_run: opts.dry_run,
                    from: opts.from.clone(),
                    ..CanaryOptions::default()
                },
                &mut trace,
            )
            .await?;

        let published = report.status == CanaryStatus::Published;
        if published {
            self.hooks.after_ship.call(&ShipResult {
                version: Some(report.version.clone()),
                commits: report.commits.clone(),
                canary: true,
            })?;
        }
        trace.enter(RunState::Done);

        Ok(ShipReport {
            version: published.then(|| report.version.clone()),
            last_release: None,
            bump: Some(report.bump),
            commits: report.commits.clone(),
            release: None,
            canary: Some(report),
            dry_run: opts.dry_run,
            trace,
        })
    }

    /// Computes the bump, version, and notes for the unreleased commits.
    async fn draft(&self, opts: &ShipOptions) -> AppResult<Option<ReleaseContext>> {
        let latest = self.commit_log.latest_release_ref().await?;
        let from = self.range_from(opts.from.as_deref(), latest.as_deref()).await?;
        let computation = self.versions.compute(&from, opts.to.as_deref()).await?;

        let Some(bump) = computation.bump else {
            return Ok(None);
        };

        let last_release = self.previous_version(latest.as_deref()).await?;
        let current_version = next_version(&last_release, bump, self.config.version_prefix())?;
        let notes = self
            .generator
            .generate(&computation.commits, &last_release, bump);

        Ok(Some(ReleaseContext {
            bump,
            commits: computation.commits,
            notes,
            current_version,
            last_release,
        }))
    }

    async fn commit_changelog(&self, context: &mut ReleaseContext) -> AppResult<()> {
        self.hooks.before_commit_changelog.series(context).await?;
        self.writer
            .commit_changelog(&context.current_version, &context.notes)
            .await?;
        info!(version = %context.current_version, "Committed changelog");
        self.hooks.after_add_to_changelog.series(context).await
    }

    /// Creates the hosting release unless it already exists, then fires
    /// `after_release`.
    async fn publish_release(&self, context: &ReleaseContext) -> AppResult<Option<ReleaseInfo>> {
        let known = self.commit_log.latest_release_ref().await?;
        let release = if context.current_version == context.last_release
            || known.as_deref() == Some(context.current_version.as_str())
        {
            info!(version = %context.current_version, "Version already released, skipping release creation");
            None
        } else {
            let created = self
                .hosting
                .create_release(&NewRelease {
                    tag: context.current_version.clone(),
                    name: context.current_version.clone(),
                    notes: context.notes.clone(),
                    prerelease: false,
                })
                .await?;
            info!(version = %context.current_version, url = %created.url, "Created release");
            Some(created)
        };

        self.hooks
            .after_release
            .parallel(&PublishedRelease {
                version: context.current_version.clone(),
                last_release: context.last_release.clone(),
                commits: context.commits.clone(),
                notes: context.notes.clone(),
                release: release.clone(),
            })
            .await?;

        Ok(release)
    }

    /// Previous version: the first `get_previous_version` answer, else the
    /// latest release tag, else `0.0.0`.
    async fn previous_version(&self, latest_release_ref: Option<&str>) -> AppResult<String> {
        let args = PreviousVersionArgs {
            last_release_ref: latest_release_ref.map(String::from),
        };
        if let Some(version) = self.hooks.get_previous_version.bail(&args).await? {
            return Ok(version);
        }

        let prefix = self.config.version_prefix();
        match latest_release_ref {
            Some(tag) if semver::Version::parse(tag.trim_start_matches('v')).is_ok() => {
                Ok(tag.to_string())
            }
            Some(tag) => {
                warn!(tag = %tag, "Latest release tag is not a version, starting from 0.0.0");
                Ok(format!("{prefix}0.0.0"))
            }
            None => Ok(format!("{prefix}0.0.0")),
        }
    }

    async fn range_from(&self, explicit: Option<&str>, latest: Option<&str>) -> AppResult<String> {
        match explicit.or(latest) {
            Some(reference) => Ok(reference.to_string()),
            None => self.commit_log.first_commit_ref().await,
        }
    }

    fn require_number(&self, number: Option<u64>) -> AppResult<u64> {
        number.or(self.ci.request_number).ok_or_else(|| {
            AppError::precondition("No pull request number given and none found in the CI context")
        })
    }
}

impl std::fmt::Debug for Shipit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shipit")
            .field("owner", &self.config.owner)
            .field("repo", &self.config.repo)
            .field("ci", &self.ci)
            .finish()
    }
}
