//! IndexRepository port - abstraction for index persistence
//!
//! This trait allows the workflows to load/save the authored-object index
//! without knowing about JSON serialization details.

use std::path::Path;

use thiserror::Error;

use crate::domain::entities::Index;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index persistence errors
#[derive(Error, Debug)]
pub enum IndexError {
    /// Index file could not be read or written
    #[error("I/O error: {0}")]
    Io(String),
    /// Index file is not a valid name -> entry mapping
    #[error("parse error: {0}")]
    Parse(String),
}

/// Abstract repository for index persistence
pub trait IndexRepository {
    /// Load the index, failing on missing or malformed files
    fn load(&self, path: &Path) -> IndexResult<Index>;

    /// Load the index, or an empty one when the file does not exist
    ///
    /// Malformed files still fail.
    fn load_or_new(&self, path: &Path) -> IndexResult<Index>;

    /// Save the index to path
    fn save(&self, index: &Index, path: &Path) -> IndexResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_repository_trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn IndexRepository) {}
    }

    #[test]
    fn index_error_display() {
        let err = IndexError::Parse("expected object".to_string());
        assert!(err.to_string().contains("expected object"));
    }
}
