//! Configuration schema and loader.
//!
//! The configuration is deserialized via the `config` crate from an optional
//! TOML file overlaid with `SHIPIT__*` environment variables.

pub mod labels;
pub mod logging;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use self::labels::LabelConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::LabelBumpMap;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipitConfig {
    /// Repository owner on the hosting platform.
    #[serde(default)]
    pub owner: String,
    /// Repository name on the hosting platform.
    #[serde(default)]
    pub repo: String,
    /// Hosting platform credential.
    #[serde(default)]
    pub token: Option<String>,
    /// Trunk branch; builds of any other branch publish canaries.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    /// Label sets per bump kind.
    #[serde(default)]
    pub labels: LabelConfig,
    /// Label added to requests and issues once released.
    #[serde(default = "default_released_label")]
    pub released_label: String,
    /// Lock referenced issues after a release.
    #[serde(default)]
    pub lock_issues: bool,
    /// Tag versions without the leading `v`.
    #[serde(default)]
    pub no_version_prefix: bool,
    /// Changelog file, relative to the repository root.
    #[serde(default = "default_changelog_path")]
    pub changelog_path: String,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShipitConfig {
    /// Creates a configuration with defaults for the given repository.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: None,
            base_branch: default_base_branch(),
            labels: LabelConfig::default(),
            released_label: default_released_label(),
            lock_issues: false,
            no_version_prefix: false,
            changelog_path: default_changelog_path(),
            logging: LoggingConfig::default(),
        }
    }

    /// Sets the credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Load configuration from an optional TOML file and the environment.
    pub fn load(path: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SHIPIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        debug!(
            path = %path,
            owner = %config.owner,
            repo = %config.repo,
            base_branch = %config.base_branch,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Rejects configurations that must not reach any side effect.
    pub fn validate(&self) -> AppResult<()> {
        self.check().inspect_err(|e| warn!(error = %e, "Configuration rejected"))
    }

    fn check(&self) -> AppResult<()> {
        if self.owner.trim().is_empty() || self.repo.trim().is_empty() {
            return Err(AppError::configuration(
                "Cannot find repository owner and name; set 'owner' and 'repo'",
            ));
        }
        if self.token.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(AppError::configuration(
                "No hosting credential found; set 'token' or SHIPIT__TOKEN",
            ));
        }
        self.label_map()?;
        Ok(())
    }

    /// Builds the label → bump map, failing on conflicting labels.
    pub fn label_map(&self) -> AppResult<LabelBumpMap> {
        self.labels.to_bump_map()
    }

    /// Tag prefix for released versions.
    pub fn version_prefix(&self) -> &'static str {
        if self.no_version_prefix { "" } else { "v" }
    }
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_released_label() -> String {
    "released".to_string()
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}
