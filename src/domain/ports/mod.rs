//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod file_system;
pub mod index_repository;
pub mod model_repository;
pub mod version_control;

pub use file_system::FileSystem;
pub use index_repository::{IndexError, IndexRepository, IndexResult};
pub use model_repository::ModelRepository;
pub use version_control::{Signature, VersionControl};
