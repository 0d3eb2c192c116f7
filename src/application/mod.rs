//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `AutosyncUseCase` - Run tasks for one model kind, then commit and push
//! - `CreateSspUseCase` - Register an SSP, generate its markdown, assemble it
//!
//! ## Building blocks
//!
//! - `authored` - Assemble/regenerate for each model kind
//! - `tasks` - Apply an authored operation across a workspace

pub mod authored;
pub mod autosync;
pub mod create_ssp;
pub mod tasks;

use std::path::Path;

use crate::domain::entities::Index;
use crate::domain::ports::IndexRepository;
use crate::error::{ComplySyncError, ComplySyncResult};

pub use authored::{authored_object, AuthoredObject};
pub use autosync::{AutosyncOptions, AutosyncResult, AutosyncUseCase, PublishOptions};
pub use create_ssp::{CreateSspOptions, CreateSspUseCase};
pub use tasks::{AssembleTask, RegenerateTask, TaskReport};

/// Load the index, failing on missing or malformed files
pub fn load_index<IR: IndexRepository>(repo: &IR, path: &Path) -> ComplySyncResult<Index> {
    repo.load(path).map_err(|e| ComplySyncError::InvalidIndex {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the index, or start an empty one when the file does not exist
pub fn load_index_or_new<IR: IndexRepository>(repo: &IR, path: &Path) -> ComplySyncResult<Index> {
    repo.load_or_new(path).map_err(|e| ComplySyncError::InvalidIndex {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
