//! The Python environment a compy project installs its dependencies into.
//!
//! [`PythonEnvironment`] is the capability the dependency commands need from
//! an environment. [`VirtualEnv`] implements it on top of a `venv` directory
//! by running the interpreter and `pip` inside of it.

mod error;
mod venv;

use std::{
    collections::{BTreeMap, BTreeSet},
    future::Future,
};

pub use error::EnvironmentError;
pub use venv::VirtualEnv;

/// Maps an importable top-level module to the distributions that provide it.
pub type PackageDistributions = BTreeMap<String, Vec<String>>;

/// Operations on an installed Python environment.
pub trait PythonEnvironment {
    /// Returns which distributions provide which top-level modules.
    fn package_distributions(
        &self,
    ) -> impl Future<Output = Result<PackageDistributions, EnvironmentError>>;

    /// Installs the given requirements.
    fn install(
        &self,
        requirements: &[String],
    ) -> impl Future<Output = Result<(), EnvironmentError>>;

    /// Uninstalls the given distributions without asking for confirmation.
    fn uninstall(
        &self,
        distributions: &[String],
    ) -> impl Future<Output = Result<(), EnvironmentError>>;
}

/// Parses the output of `importlib.metadata.packages_distributions()`
/// serialized as JSON.
pub fn parse_package_distributions(
    output: &[u8],
) -> Result<PackageDistributions, EnvironmentError> {
    serde_json::from_slice(output).map_err(EnvironmentError::MalformedOutput)
}

/// Inverts a module to distribution mapping. A distribution that provides
/// several modules maps to all of them.
pub fn invert_distributions(
    distributions: &PackageDistributions,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut inverted: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (module, dists) in distributions {
        for dist in dists {
            inverted
                .entry(dist.clone())
                .or_default()
                .insert(module.clone());
        }
    }
    inverted
}
