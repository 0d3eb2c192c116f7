//! Configuration file layout
//!
//! ```toml
//! [git]
//! branch = "main"
//! committer_name = "compliance-bot"
//! committer_email = "bot@example.com"
//! file_patterns = ["md_ssp", "system-security-plans"]
//!
//! [model]
//! oscal_model = "ssp"
//! markdown_path = "md_ssp"
//! ssp_index_path = "ssp-index.json"
//! ```
//!
//! Every key is optional; command-line flags take precedence.

use serde::Deserialize;

/// Top level of `.complysync.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub git: GitSection,
    pub model: ModelSection,
}

/// `[git]` table: identity and publishing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitSection {
    pub branch: Option<String>,
    pub remote: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub commit_message: Option<String>,
    pub file_patterns: Option<Vec<String>>,
    pub target_branch: Option<String>,
}

/// `[model]` table: what is synced and where the markdown lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub oscal_model: Option<String>,
    pub markdown_path: Option<String>,
    pub ssp_index_path: Option<String>,
    pub skip_items: Option<Vec<String>>,
}

/// Keys accepted anywhere in the file, used for typo suggestions
pub(crate) const KNOWN_KEYS: &[&str] = &[
    "git",
    "model",
    "branch",
    "remote",
    "committer_name",
    "committer_email",
    "author_name",
    "author_email",
    "commit_message",
    "file_patterns",
    "target_branch",
    "oscal_model",
    "markdown_path",
    "ssp_index_path",
    "skip_items",
];
