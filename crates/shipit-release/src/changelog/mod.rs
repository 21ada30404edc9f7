//! Default release-notes generator.

pub mod markdown;

pub use markdown::MarkdownChangelog;
