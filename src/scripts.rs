//! Running the scripts of a project.
//!
//! A script is a module in the `scripts` directory of one of the packages of
//! the project. It is run with `python -m` so that it can import the package
//! it belongs to.

use std::path::PathBuf;

use compy_consts::consts;
use compy_environment::{EnvironmentError, VirtualEnv};
use miette::Diagnostic;
use thiserror::Error;

use crate::Project;

#[derive(Debug, Error, Diagnostic)]
pub enum ScriptError {
    #[error("script '{0}' not found")]
    #[diagnostic(help("scripts live in `<package>/scripts/<script>.py`"))]
    ScriptNotFound(String),

    #[error("failed to run script '{script}'")]
    Run {
        script: String,
        #[source]
        #[diagnostic_source]
        source: EnvironmentError,
    },
}

/// A script that was found in one of the packages of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub package: String,
    pub name: String,
    pub path: PathBuf,
}

impl Script {
    /// The module path to pass to `python -m`.
    pub fn module(&self) -> String {
        format!("{}.{}.{}", self.package, consts::SCRIPTS_DIR, self.name)
    }
}

/// Finds the script with the given name in the first package that has it.
pub fn find_script(project: &Project, name: &str) -> Result<Script, ScriptError> {
    project
        .manifest()
        .package_layout()
        .into_iter()
        .find_map(|(package, dir)| {
            let path = project
                .root()
                .join(dir)
                .join(consts::SCRIPTS_DIR)
                .join(format!("{name}.py"));
            path.is_file().then(|| Script {
                package,
                name: name.to_string(),
                path,
            })
        })
        .ok_or_else(|| ScriptError::ScriptNotFound(name.to_string()))
}

/// Runs a script of the project in its virtual environment and returns the
/// exit code of the script.
pub async fn run_script(
    project: &Project,
    venv: &VirtualEnv,
    name: &str,
    args: &[String],
) -> Result<i32, ScriptError> {
    let script = find_script(project, name)?;
    tracing::info!("running {}", script.path.display());

    let status = venv
        .run_module(&script.module(), args, project.root())
        .await
        .map_err(|source| ScriptError::Run {
            script: name.to_string(),
            source,
        })?;
    Ok(status.code().unwrap_or(1))
}
