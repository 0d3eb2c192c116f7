//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Log output setup
//! - Creating use cases with infrastructure dependencies
//!
//! ## Structure
//!
//! - `cli` - Argument definitions
//! - `commands` - Runs the parsed command
//! - `logging` - tracing subscriber on stderr

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Commands};
pub use commands::run;
