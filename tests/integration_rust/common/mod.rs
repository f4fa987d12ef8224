#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    path::{Path, PathBuf},
};

use compy::{Interface, Project};
use compy_consts::consts;
use compy_environment::{EnvironmentError, PackageDistributions, PythonEnvironment};
use tempfile::TempDir;

/// A scratch project in a temporary directory.
pub struct CompyControl {
    tmpdir: TempDir,
}

impl CompyControl {
    /// Creates a project named `demo` with a single package in `demo/`.
    pub fn new(dependencies: &[&str]) -> Self {
        Self::with_layout(dependencies, &[("demo", "demo")])
    }

    pub fn with_layout(dependencies: &[&str], layout: &[(&str, &str)]) -> Self {
        let tmpdir = tempfile::tempdir().unwrap();
        let dependencies = dependencies
            .iter()
            .map(|d| format!("\"{d}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let mut manifest =
            format!("[project]\nname = \"demo\"\ndependencies = [{dependencies}]\n");
        manifest.push_str("\n[tool.setuptools.package-dir]\n");
        for (package, dir) in layout {
            manifest.push_str(&format!("{package} = \"{dir}\"\n"));
            fs_err::create_dir_all(tmpdir.path().join(dir)).unwrap();
        }
        fs_err::write(tmpdir.path().join(consts::PYPROJECT_MANIFEST), manifest).unwrap();
        Self { tmpdir }
    }

    pub fn path(&self) -> &Path {
        self.tmpdir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join(consts::PYPROJECT_MANIFEST)
    }

    pub fn manifest_contents(&self) -> String {
        fs_err::read_to_string(self.manifest_path()).unwrap()
    }

    /// Writes a source file relative to the project root.
    pub fn write_source(&self, path: &str, contents: &str) -> &Self {
        let path = self.path().join(path);
        fs_err::create_dir_all(path.parent().unwrap()).unwrap();
        fs_err::write(path, contents).unwrap();
        self
    }

    pub fn project(&self) -> Project {
        Project::load(self.path()).unwrap()
    }

    /// The dependencies as they are on disk.
    pub fn declared(&self) -> Vec<String> {
        self.project().manifest().dependencies().to_vec()
    }
}

/// Something that was asked of a [`FakeEnvironment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentCall {
    Query,
    Install(Vec<String>),
    Uninstall(Vec<String>),
}

/// An environment that records what it is asked to do.
#[derive(Default)]
pub struct FakeEnvironment {
    pub distributions: PackageDistributions,
    pub fail_install: bool,
    pub fail_uninstall: bool,
    pub calls: RefCell<Vec<EnvironmentCall>>,
}

impl FakeEnvironment {
    /// An environment where each of the modules is provided by the given
    /// distributions.
    pub fn with_distributions(distributions: &[(&str, &[&str])]) -> Self {
        Self {
            distributions: distributions
                .iter()
                .map(|(module, dists)| {
                    (
                        module.to_string(),
                        dists.iter().map(|d| d.to_string()).collect(),
                    )
                })
                .collect::<BTreeMap<_, _>>(),
            ..Self::default()
        }
    }

    pub fn failing_install(mut self) -> Self {
        self.fail_install = true;
        self
    }

    pub fn failing_uninstall(mut self) -> Self {
        self.fail_uninstall = true;
        self
    }

    pub fn calls(&self) -> Vec<EnvironmentCall> {
        self.calls.borrow().clone()
    }

    pub fn installer_calls(&self) -> Vec<EnvironmentCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != EnvironmentCall::Query)
            .collect()
    }

    fn failure(command: &str) -> EnvironmentError {
        EnvironmentError::CommandFailed {
            command: command.to_string(),
            status: failed_status(),
        }
    }
}

#[cfg(unix)]
fn failed_status() -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(1 << 8)
}

#[cfg(windows)]
fn failed_status() -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(1)
}

impl PythonEnvironment for FakeEnvironment {
    async fn package_distributions(&self) -> Result<PackageDistributions, EnvironmentError> {
        self.calls.borrow_mut().push(EnvironmentCall::Query);
        Ok(self.distributions.clone())
    }

    async fn install(&self, requirements: &[String]) -> Result<(), EnvironmentError> {
        self.calls
            .borrow_mut()
            .push(EnvironmentCall::Install(requirements.to_vec()));
        if self.fail_install {
            return Err(Self::failure("pip install"));
        }
        Ok(())
    }

    async fn uninstall(&self, distributions: &[String]) -> Result<(), EnvironmentError> {
        self.calls
            .borrow_mut()
            .push(EnvironmentCall::Uninstall(distributions.to_vec()));
        if self.fail_uninstall {
            return Err(Self::failure("pip uninstall -y"));
        }
        Ok(())
    }
}

/// A message that was shown through a [`ScriptedInterface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Question(String),
    Message(String),
    Success(String),
    Warning(String),
    Error(String),
}

/// Answers questions from a script and records everything it is told.
#[derive(Default)]
pub struct ScriptedInterface {
    answers: RefCell<VecDeque<bool>>,
    shown: RefCell<Vec<Shown>>,
}

impl ScriptedInterface {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.shown.borrow().clone()
    }

    pub fn questions(&self) -> usize {
        self.shown()
            .iter()
            .filter(|s| matches!(s, Shown::Question(_)))
            .count()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Warning(msg) => Some(console::strip_ansi_codes(&msg).to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl Interface for ScriptedInterface {
    fn confirm(&self, msg: &str) -> miette::Result<bool> {
        self.shown
            .borrow_mut()
            .push(Shown::Question(msg.to_string()));
        // An unscripted question is answered like an aborted prompt.
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }

    fn message(&self, msg: &str) {
        self.shown.borrow_mut().push(Shown::Message(msg.to_string()));
    }

    fn success(&self, msg: &str) {
        self.shown.borrow_mut().push(Shown::Success(msg.to_string()));
    }

    fn warning(&self, msg: &str) {
        self.shown.borrow_mut().push(Shown::Warning(msg.to_string()));
    }

    fn error(&self, msg: &str) {
        self.shown.borrow_mut().push(Shown::Error(msg.to_string()));
    }
}
