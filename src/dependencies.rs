//! Adding and removing declared dependencies.

use std::str::FromStr;

use compy_consts::consts;
use compy_environment::{EnvironmentError, PythonEnvironment};
use compy_manifest::{ManifestError, TomlError};
use itertools::Itertools;
use miette::Diagnostic;
use pep508_rs::{Pep508Error, Requirement, VerbatimUrl};
use thiserror::Error;

use crate::{Interface, Project};

#[derive(Debug, Error, Diagnostic)]
pub enum DependencyError {
    #[error("'{requirement}' is not a valid requirement")]
    #[diagnostic(help("requirements look like `requests`, `numpy>=2` or `rich[jupyter]~=13.0`"))]
    InvalidRequirement {
        requirement: String,
        #[source]
        source: Box<Pep508Error<VerbatimUrl>>,
    },

    #[error("failed to install {}", .0.iter().join(" "))]
    Install(
        Vec<String>,
        #[source]
        #[diagnostic_source]
        EnvironmentError,
    ),

    #[error("failed to uninstall {}", .0.iter().join(" "))]
    Uninstall(
        Vec<String>,
        #[source]
        #[diagnostic_source]
        EnvironmentError,
    ),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Toml(#[from] TomlError),
}

/// Parses a PEP 508 requirement such as `numpy>=2`.
pub fn parse_requirement(requirement: &str) -> Result<Requirement, DependencyError> {
    Requirement::<VerbatimUrl>::from_str(requirement).map_err(|source| {
        DependencyError::InvalidRequirement {
            requirement: requirement.to_string(),
            source: Box::new(source),
        }
    })
}

/// Returns the normalized distribution name of a requirement, or `None` if
/// the string is not a valid requirement.
pub fn requirement_name(requirement: &str) -> Option<String> {
    Requirement::<VerbatimUrl>::from_str(requirement)
        .ok()
        .map(|requirement| requirement.name.to_string())
}

/// Declares the given requirements as dependencies of the project.
///
/// All requirements are validated before anything happens. When an
/// environment is given the requirements are installed first and the
/// manifest is only written when that succeeds. Returns the requirements that
/// were added to the manifest.
pub async fn add_dependencies<E: PythonEnvironment, I: Interface>(
    project: &mut Project,
    requirements: &[String],
    environment: Option<&E>,
    interface: &I,
) -> miette::Result<Vec<String>> {
    for requirement in requirements {
        parse_requirement(requirement)?;
    }

    let declared = project.manifest().dependencies();
    let new = requirements
        .iter()
        .filter(|requirement| !declared.contains(requirement))
        .unique()
        .cloned()
        .collect_vec();

    for requirement in requirements.iter().filter(|r| declared.contains(r)) {
        interface.warning(&format!(
            "{} is already a dependency",
            consts::DEPENDENCY_STYLE.apply_to(requirement)
        ));
    }
    if new.is_empty() {
        return Ok(new);
    }

    match environment {
        Some(environment) => {
            interface.message(&format!(
                "Installing {}",
                new.iter()
                    .map(|r| consts::DEPENDENCY_STYLE.apply_to(r))
                    .join(" ")
            ));
            environment
                .install(&new)
                .await
                .map_err(|source| DependencyError::Install(new.clone(), source))?;
        }
        None => interface.warning("Virtual environment not found, skipping installation"),
    }

    let added = project
        .manifest_mut()
        .add_dependencies(new)
        .map_err(DependencyError::from)?;
    project.save().map_err(DependencyError::from)?;

    interface.success(&format!(
        "Added {}",
        added
            .iter()
            .map(|r| consts::DEPENDENCY_STYLE.apply_to(r))
            .join(" ")
    ));
    Ok(added)
}

/// Removes dependencies from the project.
///
/// A declared dependency is removed when it is equal to one of `names` or
/// when it requires the same distribution, so `requests` also removes
/// `requests>=2.31`. Returns the removed manifest entries.
pub async fn remove_dependencies<E: PythonEnvironment, I: Interface>(
    project: &mut Project,
    names: &[String],
    environment: Option<&E>,
    interface: &I,
) -> miette::Result<Vec<String>> {
    let targets = names
        .iter()
        .map(|name| -> Result<_, DependencyError> {
            Ok((name.as_str(), parse_requirement(name)?.name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let matches_target = |declared: &str, (raw, name): &(&str, String)| {
        declared == *raw || requirement_name(declared).as_deref() == Some(name.as_str())
    };

    let declared = project.manifest().dependencies();
    for target in &targets {
        if !declared.iter().any(|d| matches_target(d.as_str(), target)) {
            interface.warning(&format!(
                "{} is not a dependency",
                consts::DEPENDENCY_STYLE.apply_to(target.0)
            ));
        }
    }

    let to_remove = declared
        .iter()
        .filter(|d| targets.iter().any(|target| matches_target(d.as_str(), target)))
        .cloned()
        .collect_vec();
    if to_remove.is_empty() {
        return Ok(to_remove);
    }

    match environment {
        Some(environment) => {
            let distributions = to_remove
                .iter()
                .map(|d| requirement_name(d).unwrap_or_else(|| d.clone()))
                .unique()
                .collect_vec();
            environment
                .uninstall(&distributions)
                .await
                .map_err(|source| DependencyError::Uninstall(distributions, source))?;
        }
        None => interface.warning("Virtual environment not found, skipping uninstallation"),
    }

    let removed = project
        .manifest_mut()
        .remove_dependencies(|d| to_remove.iter().any(|r| r == d))
        .map_err(DependencyError::from)?;
    project.save().map_err(DependencyError::from)?;

    interface.success(&format!(
        "Removed {}",
        removed
            .iter()
            .map(|r| consts::DEPENDENCY_STYLE.apply_to(r))
            .join(" ")
    ));
    Ok(removed)
}
