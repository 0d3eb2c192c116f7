//! complysync CLI - keep authored OSCAL markdown and models in sync under git
//!
//! Usage: complysync --oscal-model <MODEL> --markdown-path <PATH> --branch <BRANCH> ...
//!        complysync create-ssp --name <NAME> --profile <PROFILE> --components <A,B> ...
//!
//! Exit codes: 0 success, 1 workflow failure, 2 invalid configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use complysync::presentation::{self, logging, Cli};
use complysync::ComplySyncError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn try_main(cli: &Cli) -> Result<()> {
    presentation::run(cli)?;
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ComplySyncError>() {
        Some(err) if err.is_configuration() => 2,
        _ => 1,
    }
}
