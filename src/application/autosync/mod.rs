//! Autosync Use Case
//!
//! Runs the assemble/regenerate tasks for one model kind and publishes the
//! result through version control.
//!
//! This module handles:
//! - Running the tasks in order (assemble, then regenerate)
//! - Check-only runs that fail when the tasks changed tracked content
//! - Staging, committing and pushing the changes

mod options;
mod result;
mod use_case;

pub use options::{AutosyncOptions, PublishOptions, DEFAULT_COMMIT_MESSAGE, DEFAULT_REMOTE};
pub use result::AutosyncResult;
pub use use_case::AutosyncUseCase;
