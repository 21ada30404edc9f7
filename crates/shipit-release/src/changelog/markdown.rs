//! Markdown release notes grouped by bump kind.

use std::collections::BTreeMap;
use std::fmt::Write;

use shipit_core::traits::ChangelogGenerator;
use shipit_core::types::{BumpKind, Commit, LabelBumpMap};

/// Renders one section per bump kind, highest first.
///
/// Commits labelled `skip` are left out; unlabelled commits go under
/// "Other Changes".
#[derive(Debug, Clone, Default)]
pub struct MarkdownChangelog {
    labels: LabelBumpMap,
}

impl MarkdownChangelog {
    /// Creates a generator using the given label map.
    pub fn new(labels: LabelBumpMap) -> Self {
        Self { labels }
    }

    fn section_title(kind: BumpKind) -> &'static str {
        match kind {
            BumpKind::Major => "#### 💥 Breaking Change",
            BumpKind::Minor => "#### 🚀 Enhancement",
            BumpKind::Patch => "#### 🐛 Bug Fix",
            BumpKind::Skip | BumpKind::None => "#### Other Changes",
        }
    }

    fn entry(commit: &Commit) -> String {
        match commit.request {
            Some(number) if commit.subject.ends_with(&format!("(#{number})")) => {
                format!("- {}", commit.subject)
            }
            Some(number) => format!("- {} (#{number})", commit.subject),
            None => format!("- {} ({})", commit.subject, commit.short_sha()),
        }
    }
}

impl ChangelogGenerator for MarkdownChangelog {
    fn generate(&self, commits: &[Commit], previous_version: &str, bump: BumpKind) -> String {
        let mut sections: BTreeMap<BumpKind, Vec<String>> = BTreeMap::new();
        for commit in commits {
            let kind = self.labels.resolve(&commit.labels);
            if kind == BumpKind::Skip {
                continue;
            }
            sections.entry(kind).or_default().push(Self::entry(commit));
        }

        if sections.is_empty() {
            return format!("No notable changes since {previous_version}.\n");
        }

        let mut notes = String::new();
        let _ = writeln!(notes, "Release type: {bump}, since {previous_version}");
        for (kind, entries) in sections.iter().rev() {
            let _ = writeln!(notes, "\n{}\n", Self::section_title(*kind));
            for entry in entries {
                let _ = writeln!(notes, "{entry}");
            }
        }
        notes
    }
}
