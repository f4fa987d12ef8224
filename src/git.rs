use std::{
    path::Path,
    process::{ExitStatus, Stdio},
};

use miette::Diagnostic;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error, Diagnostic)]
pub enum GitError {
    #[error("could not find `git`")]
    #[diagnostic(help("install git or pass `--no-git`"))]
    NotFound(#[source] which::Error),

    #[error("failed to run `git`")]
    Spawn(#[source] std::io::Error),

    #[error("`git init` failed ({0})")]
    Failed(ExitStatus),
}

/// Creates an empty git repository in `path`.
pub async fn init_repository(path: &Path) -> Result<(), GitError> {
    let git = which::which("git").map_err(GitError::NotFound)?;
    tracing::debug!(
        "initializing a git repository in {} with {}",
        path.display(),
        git.display()
    );

    let status = Command::new(git)
        .arg("init")
        .arg("--quiet")
        .arg(path)
        .stdout(Stdio::null())
        .status()
        .await
        .map_err(GitError::Spawn)?;
    if !status.success() {
        return Err(GitError::Failed(status));
    }
    Ok(())
}
