//! # shipit-git
//!
//! Git-backed collaborators for the release engine: a commit log that reads
//! history through the system `git` binary and enriches commits with the
//! labels of the requests they were merged through, and a changelog writer
//! that prepends release notes to a file and commits it.

pub mod changelog;
pub mod log;
pub mod repo;

pub use changelog::FileChangelog;
pub use log::{GitCommitLog, request_number};
pub use repo::GitRepo;
