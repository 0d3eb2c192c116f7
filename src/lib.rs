//! complysync - continuous compliance for OSCAL content kept in git
//!
//! Authors edit controls as markdown; complysync assembles that markdown into
//! OSCAL JSON models, regenerates markdown from the models, and commits and
//! pushes whatever changed.
//!
//! ## Layers
//!
//! - `domain` - index, OSCAL models, control markdown, profile resolution
//! - `application` - authored objects, tasks, autosync and SSP creation
//! - `infrastructure` - workspace files, git, CI providers
//! - `presentation` - CLI, logging and command wiring
//! - `config` - configuration file and settings validation

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod parser;
pub mod presentation;

pub use config::{OscalModel, Settings};
pub use domain::entities::{Index, IndexEntry, IndexLookupError};
pub use domain::value_objects::ModelKind;
pub use error::{ComplySyncError, ComplySyncResult};
