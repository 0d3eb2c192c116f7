//! Error types for complysync
//!
//! Uses `thiserror` for library errors; the binary maps them to exit codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::IndexLookupError;
use crate::domain::ports::file_system::FsError;

/// Result type alias for complysync operations
pub type ComplySyncResult<T> = Result<T, ComplySyncError>;

/// Main error type for complysync operations
#[derive(Error, Debug)]
pub enum ComplySyncError {
    /// Invalid or missing flag combination. Displays the literal diagnostic.
    #[error("{0}")]
    Configuration(String),

    /// Authored object is not listed in the index
    #[error("{kind} {name} does not exists in the index")]
    NotInIndex { kind: &'static str, name: String },

    /// Index lookup failed outside of an authored-object workflow
    #[error(transparent)]
    IndexLookup(#[from] IndexLookupError),

    /// Index file could not be read or parsed
    #[error("invalid index file {path}: {message}")]
    InvalidIndex { path: PathBuf, message: String },

    /// Model file does not exist at the conventional location
    #[error("model not found: {path}")]
    ModelNotFound { path: PathBuf },

    /// Model file is not a valid OSCAL document
    #[error("invalid model {path}: {message}")]
    InvalidModel { path: PathBuf, message: String },

    /// Markdown is structurally valid but semantically wrong
    #[error("invalid markdown in {file}: {message}")]
    InvalidMarkdown { file: PathBuf, message: String },

    /// Invalid frontmatter YAML
    #[error("invalid frontmatter in {file}: {message}")]
    InvalidFrontmatter { file: PathBuf, message: String },

    /// No frontmatter found (missing `---` delimiters)
    #[error("no frontmatter found in {file} - file must start with '---'")]
    NoFrontmatter { file: PathBuf },

    /// Frontmatter not properly closed
    #[error("unclosed frontmatter in {file} - missing closing '---'")]
    UnclosedFrontmatter { file: PathBuf },

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// External program exited unsuccessfully
    #[error("{program} exited with {status}\nstdout: {stdout}\nstderr: {stderr}")]
    ExternalTool {
        program: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// Check-only run found uncommitted changes
    #[error("check failed: {} file(s) changed: {}", files.len(), files.join(", "))]
    CheckFailed { files: Vec<String> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FsError> for ComplySyncError {
    fn from(err: FsError) -> Self {
        ComplySyncError::Io(err.into())
    }
}

impl ComplySyncError {
    /// Whether this error is a configuration problem (exit status 2)
    pub fn is_configuration(&self) -> bool {
        matches!(self, ComplySyncError::Configuration(_))
    }
}
