//! Merged settings and their validation
//!
//! Values arrive from the command line and the configuration file as
//! [`RawSettings`]; [`RawSettings::or`] layers them (the receiver wins) and
//! [`RawSettings::validate`] turns the result into typed [`Settings`].

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::application::autosync::{PublishOptions, DEFAULT_COMMIT_MESSAGE, DEFAULT_REMOTE};
use crate::domain::ports::Signature;
use crate::domain::value_objects::{ModelKind, SkipPatternError, SkipPatterns};
use crate::error::ComplySyncError;
use crate::infrastructure::GitProvider;

use super::types::FileConfig;

/// Invalid or missing setting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Must set oscal model.")]
    MissingModel,

    #[error("Invalid value {0} for oscal model. Please use catalog, profile, compdef, or ssp.")]
    InvalidModel(String),

    #[error("Must set ssp_index_path when using SSP as oscal model.")]
    MissingSspIndex,

    #[error("Must set markdown path with oscal model.")]
    MissingMarkdownPath,

    #[error("target-branch flag is set with an unset git provider. To test locally, set the GITHUB_ACTIONS or GITLAB_CI environment variable.")]
    TargetBranchWithoutProvider,

    #[error("Must set branch.")]
    MissingBranch,

    #[error("Must set committer name.")]
    MissingCommitterName,

    #[error("Must set committer email.")]
    MissingCommitterEmail,

    #[error(transparent)]
    SkipPattern(#[from] SkipPatternError),

    #[error("invalid config file {path}: {message}")]
    InvalidFile { path: PathBuf, message: String },
}

impl From<ConfigError> for ComplySyncError {
    fn from(err: ConfigError) -> Self {
        ComplySyncError::Configuration(err.to_string())
    }
}

/// The OSCAL model a run works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscalModel {
    Catalog,
    Profile,
    ComponentDefinition,
    Ssp { index_path: PathBuf },
}

impl OscalModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            OscalModel::Catalog => ModelKind::Catalog,
            OscalModel::Profile => ModelKind::Profile,
            OscalModel::ComponentDefinition => ModelKind::ComponentDefinition,
            OscalModel::Ssp { .. } => ModelKind::SystemSecurityPlan,
        }
    }

    pub fn index_path(&self) -> Option<&Path> {
        match self {
            OscalModel::Ssp { index_path } => Some(index_path),
            _ => None,
        }
    }
}

/// Unvalidated settings, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSettings {
    pub oscal_model: Option<String>,
    pub markdown_path: Option<String>,
    pub ssp_index_path: Option<String>,
    pub skip_items: Option<Vec<String>>,
    pub target_branch: Option<String>,
    pub branch: Option<String>,
    pub remote: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub commit_message: Option<String>,
    pub file_patterns: Option<Vec<String>>,
}

/// Identity and publishing settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSettings {
    pub branch: String,
    pub remote: String,
    pub committer: Signature,
    pub author: Option<Signature>,
    pub commit_message: String,
    pub file_patterns: Vec<String>,
}

/// Validated settings for an autosync run
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: OscalModel,
    pub markdown_path: PathBuf,
    pub skip: SkipPatterns,
    pub target_branch: Option<String>,
    pub provider: Option<GitProvider>,
    pub git: GitSettings,
}

impl From<&FileConfig> for RawSettings {
    fn from(file: &FileConfig) -> Self {
        Self {
            oscal_model: file.model.oscal_model.clone(),
            markdown_path: file.model.markdown_path.clone(),
            ssp_index_path: file.model.ssp_index_path.clone(),
            skip_items: file.model.skip_items.clone(),
            target_branch: file.git.target_branch.clone(),
            branch: file.git.branch.clone(),
            remote: file.git.remote.clone(),
            committer_name: file.git.committer_name.clone(),
            committer_email: file.git.committer_email.clone(),
            author_name: file.git.author_name.clone(),
            author_email: file.git.author_email.clone(),
            commit_message: file.git.commit_message.clone(),
            file_patterns: file.git.file_patterns.clone(),
        }
    }
}

impl RawSettings {
    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: RawSettings) -> Self {
        Self {
            oscal_model: self.oscal_model.or(fallback.oscal_model),
            markdown_path: self.markdown_path.or(fallback.markdown_path),
            ssp_index_path: self.ssp_index_path.or(fallback.ssp_index_path),
            skip_items: self.skip_items.or(fallback.skip_items),
            target_branch: self.target_branch.or(fallback.target_branch),
            branch: self.branch.or(fallback.branch),
            remote: self.remote.or(fallback.remote),
            committer_name: self.committer_name.or(fallback.committer_name),
            committer_email: self.committer_email.or(fallback.committer_email),
            author_name: self.author_name.or(fallback.author_name),
            author_email: self.author_email.or(fallback.author_email),
            commit_message: self.commit_message.or(fallback.commit_message),
            file_patterns: self.file_patterns.or(fallback.file_patterns),
        }
    }

    /// Validate the model settings first, then the git settings
    ///
    /// Empty strings count as unset.
    pub fn validate(self, provider: Option<GitProvider>) -> Result<Settings, ConfigError> {
        let model = match non_empty(self.oscal_model.clone()) {
            None => return Err(ConfigError::MissingModel),
            Some(value) => match ModelKind::from_cli_name(&value) {
                None => return Err(ConfigError::InvalidModel(value)),
                Some(ModelKind::Catalog) => OscalModel::Catalog,
                Some(ModelKind::Profile) => OscalModel::Profile,
                Some(ModelKind::ComponentDefinition) => OscalModel::ComponentDefinition,
                Some(ModelKind::SystemSecurityPlan) => OscalModel::Ssp {
                    index_path: non_empty(self.ssp_index_path.clone())
                        .map(PathBuf::from)
                        .ok_or(ConfigError::MissingSspIndex)?,
                },
            },
        };

        let markdown_path = non_empty(self.markdown_path.clone())
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingMarkdownPath)?;

        let target_branch = non_empty(self.target_branch.clone());
        if target_branch.is_some() && provider.is_none() {
            return Err(ConfigError::TargetBranchWithoutProvider);
        }

        let skip = match &self.skip_items {
            Some(items) => SkipPatterns::new(&list(items))?,
            None => SkipPatterns::empty(),
        };

        Ok(Settings {
            model,
            markdown_path,
            skip,
            target_branch,
            provider,
            git: self.validate_git()?,
        })
    }

    /// Validate only the git settings
    pub fn validate_git(self) -> Result<GitSettings, ConfigError> {
        let branch = non_empty(self.branch).ok_or(ConfigError::MissingBranch)?;
        let name = non_empty(self.committer_name).ok_or(ConfigError::MissingCommitterName)?;
        let email = non_empty(self.committer_email).ok_or(ConfigError::MissingCommitterEmail)?;

        let author_name = non_empty(self.author_name);
        let author_email = non_empty(self.author_email);
        let author = if author_name.is_some() || author_email.is_some() {
            Some(Signature::new(
                author_name.unwrap_or_else(|| name.clone()),
                author_email.unwrap_or_else(|| email.clone()),
            ))
        } else {
            None
        };

        let file_patterns = self.file_patterns.map(|p| list(&p)).unwrap_or_default();

        Ok(GitSettings {
            branch,
            remote: non_empty(self.remote).unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            committer: Signature::new(name, email),
            author,
            commit_message: non_empty(self.commit_message)
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            file_patterns: if file_patterns.is_empty() {
                vec![".".to_string()]
            } else {
                file_patterns
            },
        })
    }
}

impl GitSettings {
    pub fn publish_options(&self, check_only: bool, dry_run: bool) -> PublishOptions {
        PublishOptions::new(self.branch.clone(), self.committer.clone())
            .with_author(self.author.clone())
            .with_commit_message(self.commit_message.clone())
            .with_remote(self.remote.clone())
            .with_file_patterns(self.file_patterns.clone())
            .with_check_only(check_only)
            .with_dry_run(dry_run)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
