//! Contracts of the collaborators the release engine consumes.

pub mod changelog;
pub mod commit_log;
pub mod hosting;

pub use changelog::{ChangelogGenerator, ChangelogWriter};
pub use commit_log::CommitLog;
pub use hosting::HostingClient;
