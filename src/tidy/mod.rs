//! Reconciles the declared dependencies of a project with what its sources
//! import and what is installed in its environment.
//!
//! Importable module names and installable distribution names are different
//! namespaces (`import yaml` is provided by `PyYAML`). The environment reports
//! which distributions provide which modules, that mapping is inverted to
//! find the modules a declared dependency provides. A declared dependency the
//! environment knows nothing about is assumed to provide a module of the same
//! name.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use compy_consts::consts;
use compy_environment::{
    EnvironmentError, PackageDistributions, PythonEnvironment, invert_distributions,
};
use compy_imports::ScanError;
use compy_manifest::{ManifestError, TomlError};
use indexmap::IndexMap;
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::{Interface, Project, dependencies::requirement_name};

#[derive(Debug, Error, Diagnostic)]
pub enum TidyError {
    #[error("cannot use both --yes and --no")]
    #[diagnostic(help("pass at most one of them"))]
    ConfigConflict,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to scan '{}' for imports", .path.display())]
    ScanIO {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: ScanError,
    },

    #[error("failed to query the packages installed in the environment")]
    EnvironmentQuery(
        #[source]
        #[diagnostic_source]
        EnvironmentError,
    ),

    #[error("failed to {operation} {}", .packages.iter().join(" "))]
    Installer {
        operation: &'static str,
        packages: Vec<String>,
        #[source]
        #[diagnostic_source]
        source: EnvironmentError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Toml(#[from] TomlError),
}

/// Whether to apply the changes tidy proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    /// Ask the user for every set of changes.
    Ask,
}

impl Decision {
    /// Converts the `--yes` and `--no` flags, which are mutually exclusive.
    pub fn from_flags(yes: bool, no: bool) -> Result<Self, TidyError> {
        match (yes, no) {
            (true, true) => Err(TidyError::ConfigConflict),
            (true, false) => Ok(Decision::Yes),
            (false, true) => Ok(Decision::No),
            (false, false) => Ok(Decision::Ask),
        }
    }

    fn confirm(self, interface: &impl Interface, question: &str) -> miette::Result<bool> {
        match self {
            Decision::Yes => Ok(true),
            Decision::No => Ok(false),
            Decision::Ask => interface.confirm(question),
        }
    }
}

/// The difference between what a project declares and what it imports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDiff {
    /// Third-party modules imported by the project.
    pub found: BTreeSet<String>,
    /// Imported modules that no installed distribution provides.
    pub missing: BTreeSet<String>,
    /// Declared dependencies that provide none of the imported modules, in
    /// the order they are declared.
    pub unused: Vec<String>,
}

/// What happened to one half of the proposed changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    NothingToDo,
    Skipped,
    Applied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyReport {
    pub diff: DependencyDiff,
    pub install: ActionOutcome,
    pub uninstall: ActionOutcome,
    /// The entries that were removed from the manifest.
    pub removed: Vec<String>,
}

/// Scans the directories of all packages of the project and returns the
/// modules they import. The packages of the project itself are not included.
pub fn find_imports(
    root: &Path,
    layout: &IndexMap<String, PathBuf>,
) -> Result<BTreeSet<String>, TidyError> {
    let mut found = BTreeSet::new();
    for dir in layout.values() {
        let path = root.join(dir);
        let imports = compy_imports::find_imports(&path)
            .map_err(|source| TidyError::ScanIO { path, source })?;
        found.extend(imports);
    }
    for package in layout.keys() {
        found.remove(package);
    }
    Ok(found)
}

/// Computes the missing and unused dependencies.
pub fn compute_diff(
    declared: &[String],
    found: BTreeSet<String>,
    distributions: &PackageDistributions,
) -> DependencyDiff {
    let provided_by: BTreeMap<String, BTreeSet<String>> = invert_distributions(distributions);

    let missing = found
        .iter()
        .filter(|module| !distributions.contains_key(*module))
        .cloned()
        .collect();

    let unused = declared
        .iter()
        .unique()
        .filter(|dependency| {
            let used = match provided_by.get(dependency.as_str()) {
                Some(modules) => modules.iter().any(|module| found.contains(module)),
                None => found.contains(dependency.as_str()),
            };
            !used
        })
        .cloned()
        .collect();

    DependencyDiff {
        found,
        missing,
        unused,
    }
}

fn style_list<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(|name| consts::DEPENDENCY_STYLE.apply_to(name))
        .join(" ")
}

/// Installs missing and removes unused dependencies of the project.
///
/// The missing dependencies are only installed, the manifest is not changed
/// for them. Unused dependencies are uninstalled and, when that succeeds,
/// removed from the manifest. A failure to install does not prevent the
/// unused dependencies from being handled, but it is returned as an error
/// once the manifest has been written.
pub async fn tidy<E: PythonEnvironment, I: Interface>(
    project: &mut Project,
    environment: &E,
    decision: Decision,
    interface: &I,
) -> miette::Result<TidyReport> {
    let layout = project.manifest().package_layout();
    let found = find_imports(project.root(), &layout)?;
    let declared = project.manifest().dependencies().to_vec();

    let distributions = if found.is_empty() && declared.is_empty() {
        tracing::debug!("nothing is imported or declared, not querying the environment");
        PackageDistributions::new()
    } else {
        environment
            .package_distributions()
            .await
            .map_err(TidyError::EnvironmentQuery)?
    };

    let diff = compute_diff(&declared, found, &distributions);
    if diff.found.is_empty() {
        interface.message("No third-party imports found");
    } else {
        interface.message(&format!("Found imports: {}", style_list(&diff.found)));
    }

    let mut failure = None;

    let install = if diff.missing.is_empty() {
        interface.success("No missing dependencies");
        ActionOutcome::NothingToDo
    } else {
        interface.warning(&format!(
            "Missing dependencies: {}",
            style_list(&diff.missing)
        ));
        if decision.confirm(interface, "Do you want to install the missing dependencies?")? {
            let packages = diff.missing.iter().cloned().collect_vec();
            match environment.install(&packages).await {
                Ok(()) => interface.success("Installed the missing dependencies"),
                Err(source) => {
                    interface.error("Failed to install the missing dependencies");
                    failure = Some(TidyError::Installer {
                        operation: "install",
                        packages,
                        source,
                    });
                }
            }
            ActionOutcome::Applied
        } else {
            interface.message("Skipping installation of missing dependencies");
            ActionOutcome::Skipped
        }
    };

    let mut removed = Vec::new();
    let uninstall = if diff.unused.is_empty() {
        interface.success("No unused dependencies");
        ActionOutcome::NothingToDo
    } else {
        interface.warning(&format!(
            "Unused dependencies: {}",
            style_list(&diff.unused)
        ));
        if decision.confirm(interface, "Do you want to uninstall the unused dependencies?")? {
            let packages = diff
                .unused
                .iter()
                .map(|d| requirement_name(d).unwrap_or_else(|| d.clone()))
                .unique()
                .collect_vec();
            match environment.uninstall(&packages).await {
                Ok(()) => {
                    removed = project
                        .manifest_mut()
                        .remove_dependencies(|d| diff.unused.iter().any(|u| u == d))
                        .map_err(TidyError::from)?;
                    interface.success("Uninstalled the unused dependencies");
                }
                Err(source) => {
                    interface.error("Failed to uninstall the unused dependencies");
                    if failure.is_none() {
                        failure = Some(TidyError::Installer {
                            operation: "uninstall",
                            packages,
                            source,
                        });
                    }
                }
            }
            ActionOutcome::Applied
        } else {
            interface.message("Skipping uninstallation of unused dependencies");
            ActionOutcome::Skipped
        }
    };

    if !removed.is_empty() {
        project.save().map_err(TidyError::from)?;
        tracing::info!("removed {} from the manifest", removed.iter().join(", "));
    }

    if let Some(failure) = failure {
        return Err(failure.into());
    }

    interface.success("Dependencies tidied");
    Ok(TidyReport {
        diff,
        install,
        uninstall,
        removed,
    })
}
