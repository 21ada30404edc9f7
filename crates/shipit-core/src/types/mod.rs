//! Domain types shared across shipit crates.

pub mod bump;
pub mod ci;
pub mod commit;
pub mod hosting;
pub mod release;

pub use bump::{BumpKind, LabelBumpMap};
pub use ci::CiContext;
pub use commit::Commit;
pub use hosting::{Comment, NewRelease, ReleaseInfo, Request, StatusState, StatusUpdate};
pub use release::ReleaseContext;
