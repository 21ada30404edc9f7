//! Label configuration.

use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::{BumpKind, LabelBumpMap};

/// Labels signalling each bump kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Labels signalling a major bump.
    #[serde(default = "default_major")]
    pub major: Vec<String>,
    /// Labels signalling a minor bump.
    #[serde(default = "default_minor")]
    pub minor: Vec<String>,
    /// Labels signalling a patch bump.
    #[serde(default = "default_patch")]
    pub patch: Vec<String>,
    /// Labels excluding a change from releasing.
    #[serde(default = "default_skip")]
    pub skip: Vec<String>,
}

impl LabelConfig {
    /// Builds the bump map.
    pub fn to_bump_map(&self) -> AppResult<LabelBumpMap> {
        LabelBumpMap::new([
            (BumpKind::Major, self.major.clone()),
            (BumpKind::Minor, self.minor.clone()),
            (BumpKind::Patch, self.patch.clone()),
            (BumpKind::Skip, self.skip.clone()),
        ])
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            major: default_major(),
            minor: default_minor(),
            patch: default_patch(),
            skip: default_skip(),
        }
    }
}

fn default_major() -> Vec<String> {
    vec!["major".to_string()]
}

fn default_minor() -> Vec<String> {
    vec!["minor".to_string()]
}

fn default_patch() -> Vec<String> {
    vec!["patch".to_string()]
}

fn default_skip() -> Vec<String> {
    vec!["skip-release".to_string()]
}
