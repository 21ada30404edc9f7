//! Commit records as seen by the release engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An immutable commit in a release range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit hash.
    pub sha: String,
    /// First line of the message.
    pub subject: String,
    /// Full commit message.
    pub message: String,
    /// Labels of the originating request. Case-sensitive, duplicates collapse.
    pub labels: BTreeSet<String>,
    /// Number of the request this commit was merged through, if known.
    pub request: Option<u64>,
}

impl Commit {
    /// Creates a commit with no labels and no request reference.
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let subject = message.lines().next().unwrap_or_default().trim().to_string();
        Self {
            sha: sha.into(),
            subject,
            message,
            labels: BTreeSet::new(),
            request: None,
        }
    }

    /// Adds labels.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Sets the originating request number.
    pub fn with_request(mut self, number: u64) -> Self {
        self.request = Some(number);
        self
    }

    /// Returns the abbreviated (7 character) hash.
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}
