use std::{
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    time::Duration,
};

use itertools::Itertools;
use tokio::process::Command;

use crate::{
    EnvironmentError, PackageDistributions, PythonEnvironment, parse_package_distributions,
};

/// Prints the module to distribution mapping of the running interpreter.
const PACKAGES_DISTRIBUTIONS_PROGRAM: &str =
    "import importlib.metadata as im, json; print(json.dumps(im.packages_distributions()))";

/// A virtual environment created with `python -m venv`.
#[derive(Debug, Clone)]
pub struct VirtualEnv {
    root: PathBuf,
    query_timeout: Option<Duration>,
}

impl VirtualEnv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            query_timeout: None,
        }
    }

    /// Limits how long querying the installed packages may take.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Creates a new virtual environment at `root` using the given interpreter.
    pub async fn create(
        root: impl Into<PathBuf>,
        python_executable: &str,
    ) -> Result<Self, EnvironmentError> {
        let root = root.into();
        let mut command = Command::new(python_executable);
        command.arg("-m").arg("venv").arg(&root);
        run_checked(command).await?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// The interpreter of the environment.
    pub fn python(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("Scripts").join("python.exe")
        } else {
            self.root.join("bin").join("python")
        }
    }

    /// Installs the project at `project` in editable mode.
    pub async fn install_editable(&self, project: &Path) -> Result<(), EnvironmentError> {
        self.ensure_exists()?;
        let mut command = self.pip();
        command.arg("install").arg("-e").arg(project);
        run_checked(command).await
    }

    /// Runs `python -m <module> <args>` in `cwd` and returns how it exited.
    pub async fn run_module(
        &self,
        module: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<ExitStatus, EnvironmentError> {
        self.ensure_exists()?;
        let mut command = Command::new(self.python());
        command.arg("-m").arg(module).args(args).current_dir(cwd);

        let description = describe(&command);
        tracing::debug!("running {description}");
        command
            .status()
            .await
            .map_err(|source| EnvironmentError::Spawn {
                command: description,
                source,
            })
    }

    fn pip(&self) -> Command {
        let mut command = Command::new(self.python());
        command.arg("-m").arg("pip");
        command
    }

    fn ensure_exists(&self) -> Result<(), EnvironmentError> {
        if self.exists() {
            Ok(())
        } else {
            Err(EnvironmentError::NotFound(self.root.clone()))
        }
    }
}

impl PythonEnvironment for VirtualEnv {
    async fn package_distributions(&self) -> Result<PackageDistributions, EnvironmentError> {
        self.ensure_exists()?;

        let mut command = Command::new(self.python());
        command
            .arg("-c")
            .arg(PACKAGES_DISTRIBUTIONS_PROGRAM)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let description = describe(&command);
        tracing::debug!("running {description}");

        let output = command.output();
        let output = match self.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, output)
                .await
                .map_err(|_| EnvironmentError::Timeout(timeout))?,
            None => output.await,
        }
        .map_err(|source| EnvironmentError::Spawn {
            command: description,
            source,
        })?;

        if !output.status.success() {
            return Err(EnvironmentError::QueryFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_package_distributions(&output.stdout)
    }

    async fn install(&self, requirements: &[String]) -> Result<(), EnvironmentError> {
        if requirements.is_empty() {
            return Ok(());
        }
        self.ensure_exists()?;
        let mut command = self.pip();
        command.arg("install").args(requirements);
        run_checked(command).await
    }

    async fn uninstall(&self, distributions: &[String]) -> Result<(), EnvironmentError> {
        if distributions.is_empty() {
            return Ok(());
        }
        self.ensure_exists()?;
        let mut command = self.pip();
        command.arg("uninstall").arg("-y").args(distributions);
        run_checked(command).await
    }
}

/// Renders a command the way it would be typed in a shell.
fn describe(command: &Command) -> String {
    let command = command.as_std();
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|arg| arg.to_string_lossy())
        .join(" ")
}

/// Runs the command with inherited output and fails if it exits unsuccessfully.
async fn run_checked(mut command: Command) -> Result<(), EnvironmentError> {
    let description = describe(&command);
    tracing::debug!("running {description}");

    let status = command
        .status()
        .await
        .map_err(|source| EnvironmentError::Spawn {
            command: description.clone(),
            source,
        })?;
    if !status.success() {
        return Err(EnvironmentError::CommandFailed {
            command: description,
            status,
        });
    }
    Ok(())
}
