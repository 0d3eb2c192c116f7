//! FileSystem port - abstraction over file I/O operations
//!
//! The model store and the markdown writers go through this trait so tests
//! can observe (or forbid) writes.

use std::path::{Path, PathBuf};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error
    Io(std::io::Error),
}

impl FsError {
    /// Attach the path an I/O error occurred on
    pub fn at(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(err),
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for FsError {}

impl From<FsError> for std::io::Error {
    fn from(err: FsError) -> Self {
        match err {
            FsError::Io(err) => err,
            FsError::NotFound(_) => std::io::Error::new(std::io::ErrorKind::NotFound, err.to_string()),
            FsError::PermissionDenied(_) => {
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, err.to_string())
            }
        }
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with atomic writes
/// - recording fakes in tests
pub trait FileSystem {
    /// Read file content as string
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Write content to file atomically, creating parent directories
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Check if file exists
    fn exists(&self, path: &Path) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_display() {
        let err = FsError::NotFound(PathBuf::from("test.txt"));
        assert!(err.to_string().contains("test.txt"));
    }

    #[test]
    fn fs_error_at_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let fs_err = FsError::at(Path::new("catalog.json"), io_err);
        assert!(matches!(fs_err, FsError::NotFound(ref p) if p == Path::new("catalog.json")));
    }

    #[test]
    fn fs_error_converts_back_to_io() {
        let err: std::io::Error = FsError::PermissionDenied(PathBuf::from("x")).into();
        assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
    }
}
