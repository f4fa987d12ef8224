use std::path::PathBuf;

use clap::Parser;
use compy_config::Config;

use crate::{Project, cli::cli_interface::CliInterface, dependencies::remove_dependencies};

/// Removes dependencies from the project
///
/// A dependency is removed when it is spelled exactly like the argument or
/// names the same distribution, so `compy remove requests` also removes
/// `requests>=2.31`.
#[derive(Parser, Debug)]
#[clap(arg_required_else_help = true)]
pub struct Args {
    /// The dependencies to remove
    #[arg(required = true)]
    pub dependencies: Vec<String>,

    /// The path to the project
    #[arg(short, long, default_value = ".")]
    pub project_path: PathBuf,
}

pub async fn execute(args: Args, config: &Config) -> miette::Result<()> {
    let mut project = Project::load(&args.project_path)?;
    let venv = project.virtual_env(config);

    remove_dependencies(
        &mut project,
        &args.dependencies,
        venv.exists().then_some(&venv),
        &CliInterface::default(),
    )
    .await?;
    Ok(())
}
