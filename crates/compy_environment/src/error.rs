use std::{path::PathBuf, process::ExitStatus, time::Duration};

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum EnvironmentError {
    #[error("no virtual environment found at '{}'", .0.display())]
    #[diagnostic(help("Run `compy init` to create the virtual environment"))]
    NotFound(PathBuf),

    #[error("failed to run '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("querying the installed packages failed ({status})")]
    #[diagnostic(help("{stderr}"))]
    QueryFailed { status: ExitStatus, stderr: String },

    #[error("could not read the installed packages from the interpreter output")]
    MalformedOutput(#[source] serde_json::Error),

    #[error("querying the installed packages did not finish within {}s", .0.as_secs_f64())]
    #[diagnostic(help("Increase `query-timeout` in the compy settings"))]
    Timeout(Duration),

    #[error("'{command}' failed ({status})")]
    CommandFailed { command: String, status: ExitStatus },
}
