use std::path::PathBuf;

use clap::Parser;
use compy_config::Config;

use crate::{
    Project,
    cli::cli_interface::CliInterface,
    tidy::{Decision, tidy},
};

/// Installs missing and removes unused dependencies
///
/// The sources of every package of the project are scanned for imports.
/// Imported modules that no installed distribution provides are installed
/// into the virtual environment. Declared dependencies that provide none of
/// the imported modules are uninstalled and removed from `pyproject.toml`.
#[derive(Parser, Debug)]
pub struct Args {
    /// The path to the project
    #[arg(short, long, default_value = ".")]
    pub project_path: PathBuf,

    /// Apply all changes without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Only report the changes, don't apply them
    #[arg(short, long)]
    pub no: bool,
}

pub async fn execute(args: Args, config: &Config) -> miette::Result<()> {
    let decision = Decision::from_flags(args.yes, args.no)?;
    let mut project = Project::load(&args.project_path)?;
    let venv = project.virtual_env(config);

    let report = tidy(&mut project, &venv, decision, &CliInterface::default()).await?;
    tracing::debug!(
        "tidy finished, install: {:?}, uninstall: {:?}",
        report.install,
        report.uninstall
    );
    Ok(())
}
