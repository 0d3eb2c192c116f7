//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod index;
mod model;

pub use index::JsonIndexRepository;
pub use model::WorkspaceModelStore;
