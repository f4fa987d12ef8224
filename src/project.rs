use std::path::{Path, PathBuf};

use compy_config::Config;
use compy_consts::consts;
use compy_environment::VirtualEnv;
use compy_manifest::{Manifest, ManifestError};

/// A Python project: a directory with a `pyproject.toml`.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Loads the project rooted at `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let root = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let manifest = Manifest::from_path(root.join(consts::PYPROJECT_MANIFEST))?;
        tracing::debug!("loaded project '{}' from {}", manifest.name(), root.display());
        Ok(Self { root, manifest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.root.join(consts::VENV_DIR)
    }

    /// The virtual environment of the project. It may not exist yet.
    pub fn virtual_env(&self, config: &Config) -> VirtualEnv {
        VirtualEnv::new(self.venv_dir()).with_query_timeout(config.query_timeout())
    }

    pub fn save(&self) -> Result<(), ManifestError> {
        self.manifest.save()
    }
}
