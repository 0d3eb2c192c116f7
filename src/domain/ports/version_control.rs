//! VersionControl port - the git operations the bot needs
//!
//! Implemented by `infrastructure::git::GitCli`; tests substitute a
//! recording fake.

use crate::error::ComplySyncResult;

/// Name and email for a commit identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

pub trait VersionControl {
    /// Paths with uncommitted changes (staged, unstaged or untracked) matching `patterns`
    fn changed_files(&self, patterns: &[String]) -> ComplySyncResult<Vec<String>>;

    /// Stage everything matching `patterns`
    fn stage(&self, patterns: &[String]) -> ComplySyncResult<()>;

    /// Paths currently staged for commit
    fn staged_files(&self) -> ComplySyncResult<Vec<String>>;

    /// Commit the staged changes, returning the new commit SHA
    fn commit(
        &self,
        message: &str,
        committer: &Signature,
        author: Option<&Signature>,
    ) -> ComplySyncResult<String>;

    /// Push `HEAD` to `branch` on `remote`
    fn push(&self, remote: &str, branch: &str) -> ComplySyncResult<()>;
}
