//! Bump kinds and the label → bump-kind mapping.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Semantic-versioning category of a change.
///
/// The derived ordering is the fixed precedence
/// `None < Skip < Patch < Minor < Major`; it is never configurable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    /// No label matched.
    #[default]
    None,
    /// Explicitly excluded from releasing.
    Skip,
    /// Backwards compatible fix.
    Patch,
    /// Backwards compatible feature.
    Minor,
    /// Breaking change.
    Major,
}

impl BumpKind {
    /// Kinds that can carry labels, highest precedence first.
    pub const PRECEDENCE: [BumpKind; 4] = [Self::Major, Self::Minor, Self::Patch, Self::Skip];

    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Skip => "skip",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }

    /// Returns whether this kind warrants a release on its own.
    pub fn is_release(&self) -> bool {
        *self >= Self::Patch
    }

    /// Applies this bump to a version. `None` and `Skip` leave it unchanged.
    pub fn apply(&self, version: &semver::Version) -> semver::Version {
        match self {
            Self::Major => semver::Version::new(version.major + 1, 0, 0),
            Self::Minor => semver::Version::new(version.major, version.minor + 1, 0),
            Self::Patch => semver::Version::new(version.major, version.minor, version.patch + 1),
            Self::Skip | Self::None => version.clone(),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "skip" => Ok(Self::Skip),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(AppError::validation(format!("Unknown bump kind '{other}'"))),
        }
    }
}

/// Mapping from bump kind to the labels that signal it.
///
/// A label may only belong to one kind; [`LabelBumpMap::new`] rejects
/// conflicting configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBumpMap {
    labels: BTreeMap<BumpKind, BTreeSet<String>>,
}

impl LabelBumpMap {
    /// Builds a map from `(kind, labels)` pairs.
    pub fn new<I, L>(entries: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (BumpKind, L)>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut labels: BTreeMap<BumpKind, BTreeSet<String>> = BTreeMap::new();
        for (kind, set) in entries {
            if kind == BumpKind::None {
                return Err(AppError::configuration(
                    "Labels cannot be mapped to the 'none' bump kind",
                ));
            }
            labels
                .entry(kind)
                .or_default()
                .extend(set.into_iter().map(Into::into));
        }

        let map = Self { labels };
        map.check_conflicts()?;
        Ok(map)
    }

    /// Returns a copy of this map where each overridden kind uses the given labels.
    ///
    /// Precedence is unaffected; only label membership changes.
    pub fn with_overrides<I, L>(&self, overrides: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (BumpKind, L)>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut labels = self.labels.clone();
        for (kind, set) in overrides {
            if kind == BumpKind::None {
                return Err(AppError::configuration(
                    "Labels cannot be mapped to the 'none' bump kind",
                ));
            }
            labels.insert(kind, set.into_iter().map(Into::into).collect());
        }

        let map = Self { labels };
        map.check_conflicts()?;
        Ok(map)
    }

    fn check_conflicts(&self) -> AppResult<()> {
        let mut seen: BTreeMap<&str, BumpKind> = BTreeMap::new();
        for (kind, set) in &self.labels {
            for label in set {
                if let Some(previous) = seen.insert(label.as_str(), *kind) {
                    return Err(AppError::configuration(format!(
                        "Label '{label}' is configured for both '{previous}' and '{kind}'"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Labels configured for a kind.
    pub fn labels_for(&self, kind: BumpKind) -> impl Iterator<Item = &str> {
        self.labels
            .get(&kind)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Returns the kind a single label signals, if any.
    pub fn kind_of(&self, label: &str) -> Option<BumpKind> {
        BumpKind::PRECEDENCE
            .into_iter()
            .find(|kind| self.labels.get(kind).is_some_and(|set| set.contains(label)))
    }

    /// Resolves a label set to a bump kind by scanning precedence from
    /// highest to lowest; the first intersecting kind wins.
    pub fn resolve<'a, I>(&self, labels: I) -> BumpKind
    where
        I: IntoIterator<Item = &'a String> + Clone,
    {
        for kind in BumpKind::PRECEDENCE {
            let Some(set) = self.labels.get(&kind) else {
                continue;
            };
            if labels.clone().into_iter().any(|label| set.contains(label)) {
                return kind;
            }
        }
        BumpKind::None
    }
}

impl Default for LabelBumpMap {
    fn default() -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(BumpKind::Major, BTreeSet::from(["major".to_string()]));
        labels.insert(BumpKind::Minor, BTreeSet::from(["minor".to_string()]));
        labels.insert(BumpKind::Patch, BTreeSet::from(["patch".to_string()]));
        labels.insert(BumpKind::Skip, BTreeSet::from(["skip-release".to_string()]));
        Self { labels }
    }
}
