//! CLI Argument Parsing
//!
//! The root command runs autosync; `create-ssp` registers and scaffolds a new
//! SSP. Every setting is optional at parse time so the configuration file can
//! supply it; validation happens afterwards.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::RawSettings;

/// complysync - keep authored OSCAL markdown and JSON models in sync under git
#[derive(Parser, Debug)]
#[command(name = "complysync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub autosync: AutosyncArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register an SSP in the index, write its markdown and assemble it
    CreateSsp(CreateSspArgs),
}

/// Where the workspace and its configuration file live
#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceArgs {
    /// Workspace root (default: current directory)
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Configuration file (default: <working-dir>/.complysync.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl WorkspaceArgs {
    pub fn working_dir(&self) -> &Path {
        self.working_dir.as_deref().unwrap_or(Path::new("."))
    }
}

/// Commit identity and publishing
#[derive(Args, Debug, Clone, Default)]
pub struct GitArgs {
    /// Branch pushed to on the remote
    #[arg(long)]
    pub branch: Option<String>,

    #[arg(long)]
    pub committer_name: Option<String>,

    #[arg(long)]
    pub committer_email: Option<String>,

    /// Author name (default: committer)
    #[arg(long)]
    pub author_name: Option<String>,

    /// Author email (default: committer)
    #[arg(long)]
    pub author_email: Option<String>,

    /// Commit message (default: "Sync automatic updates")
    #[arg(long)]
    pub commit_message: Option<String>,

    /// Comma separated pathspecs to stage (default: ".")
    #[arg(long, value_delimiter = ',')]
    pub file_patterns: Option<Vec<String>>,

    /// Remote to push to (default: origin)
    #[arg(long)]
    pub remote: Option<String>,

    /// Fail if anything changed instead of committing
    #[arg(long)]
    pub check_only: bool,

    /// Commit locally without pushing
    #[arg(long)]
    pub dry_run: bool,
}

impl GitArgs {
    fn fill(&self, raw: RawSettings) -> RawSettings {
        RawSettings {
            branch: self.branch.clone(),
            remote: self.remote.clone(),
            committer_name: self.committer_name.clone(),
            committer_email: self.committer_email.clone(),
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            commit_message: self.commit_message.clone(),
            file_patterns: self.file_patterns.clone(),
            ..raw
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AutosyncArgs {
    /// Directory holding the markdown, one subdirectory per object
    #[arg(long)]
    pub markdown_path: Option<String>,

    /// Model to sync: catalog, profile, compdef or ssp
    #[arg(long)]
    pub oscal_model: Option<String>,

    /// SSP index file (required with --oscal-model ssp)
    #[arg(long)]
    pub ssp_index_path: Option<String>,

    /// Base branch for a follow-up pull request (needs a CI provider)
    #[arg(long)]
    pub target_branch: Option<String>,

    /// Comma separated object names or globs to leave alone
    #[arg(long, value_delimiter = ',')]
    pub skip_items: Option<Vec<String>>,

    /// Do not assemble markdown into models
    #[arg(long)]
    pub skip_assemble: bool,

    /// Do not regenerate markdown from models
    #[arg(long)]
    pub skip_regenerate: bool,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    #[command(flatten)]
    pub git: GitArgs,
}

impl AutosyncArgs {
    pub fn raw_settings(&self) -> RawSettings {
        self.git.fill(RawSettings {
            oscal_model: self.oscal_model.clone(),
            markdown_path: self.markdown_path.clone(),
            ssp_index_path: self.ssp_index_path.clone(),
            skip_items: self.skip_items.clone(),
            target_branch: self.target_branch.clone(),
            ..RawSettings::default()
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct CreateSspArgs {
    /// Name of the new SSP
    #[arg(long)]
    pub name: String,

    /// Profile the SSP implements
    #[arg(long)]
    pub profile: String,

    /// Comma separated component definitions
    #[arg(long, value_delimiter = ',', required = true)]
    pub components: Vec<String>,

    /// Parent directory for the SSP's markdown
    #[arg(long)]
    pub markdown_path: PathBuf,

    /// SSP index file, created when missing
    #[arg(long)]
    pub ssp_index_path: PathBuf,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    #[command(flatten)]
    pub git: GitArgs,
}

impl CreateSspArgs {
    pub fn raw_settings(&self) -> RawSettings {
        self.git.fill(RawSettings::default())
    }
}
