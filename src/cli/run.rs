use std::path::PathBuf;

use clap::Parser;
use compy_config::Config;
use compy_consts::consts;

use crate::{Project, scripts::run_script};

/// Runs a script of the project
///
/// Scripts are the modules in the `scripts` directory of a package, so
/// `compy run build` runs `<package>/scripts/build.py` with `python -m` in
/// the virtual environment of the project. Everything after the script name
/// is passed on to the script.
#[derive(Parser, Debug)]
#[clap(trailing_var_arg = true)]
pub struct Args {
    /// The name of the script to run
    #[arg(default_value = consts::DEFAULT_SCRIPT)]
    pub script: String,

    /// Arguments passed to the script
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// The path to the project
    #[arg(short, long, default_value = ".")]
    pub project_path: PathBuf,
}

pub async fn execute(args: Args, config: &Config) -> miette::Result<()> {
    let project = Project::load(&args.project_path)?;
    let venv = project.virtual_env(config);

    let code = run_script(&project, &venv, &args.script, &args.args).await?;
    if code != 0 {
        tracing::debug!("script '{}' exited with code {code}", args.script);
        std::process::exit(code);
    }
    Ok(())
}
