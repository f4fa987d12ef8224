use std::path::PathBuf;

use clap::Parser;
use compy_config::{Author, Config, License};
use compy_consts::consts;

use crate::{
    cli::cli_interface::CliInterface,
    init::{InitOptions, init_project},
};

/// Creates a new project
///
/// Writes a `pyproject.toml`, a package, a README, a LICENSE and a
/// `.gitignore`, creates a virtual environment with the project installed in
/// editable mode and initializes a git repository. Files that already exist
/// are left untouched, so `init` can also complete an existing project.
///
/// Defaults that are not given on the command line come from the settings
/// files and from the git configuration.
#[derive(Parser, Debug)]
pub struct Args {
    /// Where to place the project (defaults to current path)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Name of the project (defaults to the name of the directory)
    #[arg(short = 'p', long, help_heading = consts::CLAP_INIT_OPTIONS)]
    pub project_name: Option<String>,

    /// Author of the project
    #[arg(short, long, help_heading = consts::CLAP_INIT_OPTIONS)]
    pub author: Option<String>,

    /// Email address of the author
    #[arg(short, long, help_heading = consts::CLAP_INIT_OPTIONS)]
    pub email: Option<String>,

    /// License of the project
    #[arg(short, long, ignore_case = true, help_heading = consts::CLAP_INIT_OPTIONS)]
    pub license: Option<License>,

    /// Initial version of the project
    #[arg(long, help_heading = consts::CLAP_INIT_OPTIONS)]
    pub project_version: Option<String>,

    /// Description of the project
    #[arg(short, long, help_heading = consts::CLAP_INIT_OPTIONS)]
    pub description: Option<String>,

    /// Python interpreter used to create the virtual environment
    #[arg(short = 'x', long, help_heading = consts::CLAP_INIT_OPTIONS)]
    pub python_executable: Option<String>,

    /// Don't create a virtual environment
    #[arg(long)]
    pub no_venv: bool,

    /// Don't initialize a git repository
    #[arg(long)]
    pub no_git: bool,
}

impl Args {
    /// Fills in everything that was not given on the command line from the
    /// settings.
    pub fn into_options(self, config: &Config) -> InitOptions {
        let author = match self.author {
            Some(name) => Author {
                name,
                email: self.email.or_else(|| config.email.clone()),
            },
            None => {
                let mut author = config.author();
                if self.email.is_some() {
                    author.email = self.email;
                }
                author
            }
        };

        InitOptions {
            path: self.path,
            name: self.project_name,
            author,
            license: self.license.unwrap_or_else(|| config.license()),
            version: self
                .project_version
                .unwrap_or_else(|| config.version().to_string()),
            description: self
                .description
                .unwrap_or_else(|| config.description().to_string()),
            python_executable: self
                .python_executable
                .unwrap_or_else(|| config.python_executable().to_string()),
            create_venv: !self.no_venv,
            init_git: !self.no_git,
        }
    }
}

pub async fn execute(args: Args, config: &Config) -> miette::Result<()> {
    let options = args.into_options(config);
    init_project(options, &CliInterface::default()).await?;
    Ok(())
}
