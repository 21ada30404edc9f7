//! # shipit-core
//!
//! Core crate for shipit. Contains the configuration schema, domain types
//! (commits, bump kinds, label maps, CI context), the contracts of the
//! external collaborators the release engine talks to, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other shipit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
