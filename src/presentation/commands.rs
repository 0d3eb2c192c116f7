//! Command execution
//!
//! Wires settings to use cases with their infrastructure dependencies.

use tracing::{info, warn};

use crate::application::authored::{authored_object, workspace_path};
use crate::application::{
    load_index, AutosyncOptions, AutosyncResult, AutosyncUseCase, CreateSspOptions,
    CreateSspUseCase,
};
use crate::config::{load_file_config, RawSettings};
use crate::error::ComplySyncResult;
use crate::infrastructure::{GitCli, GitProvider, JsonIndexRepository};

use super::cli::{AutosyncArgs, Cli, Commands, CreateSspArgs};

pub fn run(cli: &Cli) -> ComplySyncResult<()> {
    match &cli.command {
        Some(Commands::CreateSsp(args)) => cmd_create_ssp(args),
        None => cmd_autosync(&cli.autosync),
    }
}

fn cmd_autosync(args: &AutosyncArgs) -> ComplySyncResult<()> {
    let root = args.workspace.working_dir();
    let file = load_file_config(args.workspace.config.as_deref(), root)?;
    let provider = GitProvider::detect();
    let settings = args
        .raw_settings()
        .or(RawSettings::from(&file))
        .validate(provider)?;

    let index = match settings.model.index_path() {
        Some(path) => Some(load_index(
            &JsonIndexRepository::new(),
            &workspace_path(root, path),
        )?),
        None => None,
    };
    let kind = settings.model.kind();
    let authored = authored_object(kind, root, index.as_ref())?;

    let options = AutosyncOptions {
        kind,
        markdown_dir: settings.markdown_path.clone(),
        skip_assemble: args.skip_assemble,
        skip_regenerate: args.skip_regenerate,
        publish: settings
            .git
            .publish_options(args.git.check_only, args.git.dry_run),
    };

    info!(model = %kind, markdown = %settings.markdown_path.display(), "running autosync");
    let use_case = AutosyncUseCase::new(root, GitCli::new(root));
    let result = use_case.execute(authored.as_ref(), &settings.skip, &options)?;

    report(&result, settings.provider);
    if let Some(target) = &settings.target_branch {
        info!(
            branch = %settings.git.branch,
            target = %target,
            "changes are ready for a pull request"
        );
    }
    Ok(())
}

fn cmd_create_ssp(args: &CreateSspArgs) -> ComplySyncResult<()> {
    let root = args.workspace.working_dir();
    let file = load_file_config(args.workspace.config.as_deref(), root)?;
    let git = args
        .raw_settings()
        .or(RawSettings::from(&file))
        .validate_git()?;

    let options = CreateSspOptions {
        name: args.name.clone(),
        profile: args.profile.clone(),
        components: args.components.clone(),
        markdown_dir: args.markdown_path.clone(),
        index_path: args.ssp_index_path.clone(),
    };
    let written = CreateSspUseCase::new(root, JsonIndexRepository::new()).execute(&options)?;
    info!(ssp = %args.name, controls = written, "SSP markdown written");

    let use_case = AutosyncUseCase::new(root, GitCli::new(root));
    let result = use_case.publish(&git.publish_options(args.git.check_only, args.git.dry_run))?;
    report(&result, GitProvider::detect());
    Ok(())
}

fn report(result: &AutosyncResult, provider: Option<GitProvider>) {
    match &result.commit_sha {
        Some(sha) => info!(
            commit = %sha,
            files = result.changed_files.len(),
            pushed = result.pushed,
            "committed changes"
        ),
        None => info!("no changes"),
    }

    if let Some(provider) = provider {
        if let Err(err) = provider.set_outputs(|key| std::env::var(key).ok(), &result.outputs()) {
            warn!(provider = provider.name(), error = %err, "could not write step outputs");
        }
    }
}
