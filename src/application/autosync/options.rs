//! Autosync options

use std::path::PathBuf;

use crate::domain::ports::Signature;
use crate::domain::value_objects::ModelKind;

pub const DEFAULT_COMMIT_MESSAGE: &str = "Sync automatic updates";
pub const DEFAULT_REMOTE: &str = "origin";

/// How changes are published after the tasks ran
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Pathspecs staged for commit (and inspected in check-only mode)
    pub file_patterns: Vec<String>,
    pub commit_message: String,
    pub committer: Signature,
    /// Defaults to the committer
    pub author: Option<Signature>,
    /// Branch pushed to on the remote
    pub branch: String,
    pub remote: String,
    /// Fail instead of committing when anything changed
    pub check_only: bool,
    /// Commit locally but do not push
    pub dry_run: bool,
}

impl PublishOptions {
    pub fn new(branch: impl Into<String>, committer: Signature) -> Self {
        Self {
            file_patterns: vec![".".to_string()],
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            committer,
            author: None,
            branch: branch.into(),
            remote: DEFAULT_REMOTE.to_string(),
            check_only: false,
            dry_run: false,
        }
    }

    pub fn with_file_patterns(mut self, patterns: Vec<String>) -> Self {
        self.file_patterns = patterns;
        self
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    pub fn with_author(mut self, author: Option<Signature>) -> Self {
        self.author = author;
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Options for one autosync run
#[derive(Debug, Clone)]
pub struct AutosyncOptions {
    pub kind: ModelKind,
    /// Markdown directory relative to the workspace root
    pub markdown_dir: PathBuf,
    pub skip_assemble: bool,
    pub skip_regenerate: bool,
    pub publish: PublishOptions,
}
