//! Hook handlers for the released plugin.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, info};

use shipit_core::config::ShipitConfig;
use shipit_core::error::AppError;
use shipit_core::result::AppResult;
use shipit_core::traits::HostingClient;
use shipit_plugin::{AsyncHookHandler, CanaryRelease, PublishedRelease};
use shipit_release::Announcer;

/// Announcement settings taken from the effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceSettings {
    /// Label added to released requests and issues.
    pub released_label: String,
    /// Lock closed issues after announcing.
    pub lock_issues: bool,
}

impl AnnounceSettings {
    /// Reads the announcement settings of `config`.
    pub fn from_config(config: &ShipitConfig) -> Self {
        Self {
            released_label: config.released_label.clone(),
            lock_issues: config.lock_issues,
        }
    }
}

/// Settings shared between the `before_run` capture and the announcers.
pub type SharedSettings = Arc<RwLock<AnnounceSettings>>;

/// `before_run`: remember the configuration plugins settled on.
pub fn capture_settings(settings: &SharedSettings, config: &ShipitConfig) -> AppResult<()> {
    let captured = AnnounceSettings::from_config(config);
    debug!(
        released_label = %captured.released_label,
        lock_issues = captured.lock_issues,
        "Captured announcement settings"
    );
    let mut current = settings
        .write()
        .map_err(|_| AppError::internal("Announcement settings lock poisoned"))?;
    *current = captured;
    Ok(())
}

/// Builds an announcer from the current settings.
fn announcer(client: &Arc<dyn HostingClient>, settings: &SharedSettings) -> AppResult<Announcer> {
    let current = settings
        .read()
        .map_err(|_| AppError::internal("Announcement settings lock poisoned"))?
        .clone();
    // The after_* points only fire on live runs.
    Ok(Announcer::new(
        Arc::clone(client),
        current.released_label,
        current.lock_issues,
        false,
    ))
}

/// `after_release`: announce the release on shipped requests and issues.
pub struct AfterReleaseHook {
    client: Arc<dyn HostingClient>,
    settings: SharedSettings,
}

impl AfterReleaseHook {
    /// Creates the handler.
    pub fn new(client: Arc<dyn HostingClient>, settings: SharedSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl AsyncHookHandler<PublishedRelease, ()> for AfterReleaseHook {
    async fn handle(&self, release: &PublishedRelease) -> AppResult<()> {
        if release.release.is_none() {
            info!(
                version = %release.version,
                "Release already existed, refreshing announcements"
            );
        }
        announcer(&self.client, &self.settings)?
            .announce_release(&release.version, &release.commits)
            .await
    }
}

/// `after_canary`: post the canary version on its request.
pub struct AfterCanaryHook {
    client: Arc<dyn HostingClient>,
    settings: SharedSettings,
}

impl AfterCanaryHook {
    /// Creates the handler.
    pub fn new(client: Arc<dyn HostingClient>, settings: SharedSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl AsyncHookHandler<CanaryRelease, ()> for AfterCanaryHook {
    async fn handle(&self, canary: &CanaryRelease) -> AppResult<()> {
        announcer(&self.client, &self.settings)?
            .announce_canary(&canary.version, canary.request_number, &canary.commits)
            .await
    }
}
