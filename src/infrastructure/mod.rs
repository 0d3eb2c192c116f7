//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system with atomic writes
//! - `repositories/` - Index file and workspace model store
//! - `git` - VersionControl over the `git` CLI
//! - `provider` - CI provider detection and step outputs

pub mod fs;
pub mod git;
pub mod provider;
pub mod repositories;

pub use fs::LocalFs;
pub use git::GitCli;
pub use provider::GitProvider;
pub use repositories::{JsonIndexRepository, WorkspaceModelStore};
