//! Idempotent comment and label mutation, and the release announcement built on it.

pub mod announce;
pub mod issues;
pub mod manager;

pub use announce::Announcer;
pub use issues::closing_issue_numbers;
pub use manager::{CommentManager, context_marker};
