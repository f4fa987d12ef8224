use std::path::PathBuf;

use clap::Parser;
use compy_config::Config;

use crate::{Project, cli::cli_interface::CliInterface, dependencies::add_dependencies};

/// Adds dependencies to the project
///
/// Every dependency must be a PEP 508 requirement, e.g. `requests` or
/// `numpy>=2`. When the project has a virtual environment the dependencies
/// are installed first and only declared once that succeeded.
#[derive(Parser, Debug)]
#[clap(arg_required_else_help = true)]
pub struct Args {
    /// The dependencies to add
    #[arg(required = true)]
    pub dependencies: Vec<String>,

    /// The path to the project
    #[arg(short, long, default_value = ".")]
    pub project_path: PathBuf,
}

pub async fn execute(args: Args, config: &Config) -> miette::Result<()> {
    let mut project = Project::load(&args.project_path)?;
    let venv = project.virtual_env(config);

    add_dependencies(
        &mut project,
        &args.dependencies,
        venv.exists().then_some(&venv),
        &CliInterface::default(),
    )
    .await?;
    Ok(())
}
