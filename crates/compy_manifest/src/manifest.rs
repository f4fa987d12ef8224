use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use indexmap::IndexMap;
use miette::NamedSource;
use toml_edit::DocumentMut;

use crate::{ManifestError, PyProjectManifest, TomlDocument, TomlError, WithSourceCode};

/// A loaded `pyproject.toml`.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    document: TomlDocument,
    parsed: PyProjectManifest,
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document)
    }
}

impl Manifest {
    /// Reads the manifest at the given path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let contents = match fs_err::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::NotFound(
                    path.parent().unwrap_or(path).to_path_buf(),
                ));
            }
            Err(source) => {
                return Err(ManifestError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_source(path, contents)
    }

    /// Parses the manifest from its contents. The path is only used for
    /// error reporting and for [`Manifest::save`].
    pub fn from_source(
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Result<Self, ManifestError> {
        let path = path.into();
        let contents = contents.into();

        let parse = |contents: &str| -> Result<(TomlDocument, PyProjectManifest), TomlError> {
            let document = DocumentMut::from_str(contents)?;
            let parsed = PyProjectManifest::from_toml_str(contents)?;
            Ok((TomlDocument::new(document), parsed))
        };

        match parse(&contents) {
            Ok((document, parsed)) => Ok(Self {
                path,
                document,
                parsed,
            }),
            Err(error) => {
                let name = path.display().to_string();
                Err(Box::new(WithSourceCode {
                    error,
                    source: NamedSource::new(name, Arc::<str>::from(contents)),
                })
                .into())
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.parsed.project.name
    }

    /// The declared dependencies in `project.dependencies`, in the order they
    /// are written.
    pub fn dependencies(&self) -> &[String] {
        &self.parsed.project.dependencies
    }

    /// The packages of the project mapped to their directory, relative to the
    /// project root.
    pub fn package_layout(&self) -> IndexMap<String, PathBuf> {
        self.parsed
            .package_dir()
            .map(|dirs| {
                dirs.iter()
                    .map(|(name, dir)| (name.clone(), PathBuf::from(dir)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Appends the given requirements to `project.dependencies`. Requirements
    /// that are already declared verbatim are skipped.
    ///
    /// Returns the requirements that were added.
    pub fn add_dependencies<S: Into<String>>(
        &mut self,
        requirements: impl IntoIterator<Item = S>,
    ) -> Result<Vec<String>, TomlError> {
        let mut added = Vec::new();
        for requirement in requirements {
            let requirement = requirement.into();
            if self.parsed.project.dependencies.contains(&requirement) {
                tracing::debug!("'{requirement}' is already a dependency");
                continue;
            }
            self.document
                .get_or_insert_toml_array_mut(&["project"], "dependencies")?
                .push(requirement.as_str());
            self.parsed.project.dependencies.push(requirement.clone());
            added.push(requirement);
        }
        Ok(added)
    }

    /// Removes every entry of `project.dependencies` for which the predicate
    /// returns `true`. The order of the remaining entries is kept.
    ///
    /// Returns the removed entries.
    pub fn remove_dependencies(
        &mut self,
        mut predicate: impl FnMut(&str) -> bool,
    ) -> Result<Vec<String>, TomlError> {
        let (removed, kept): (Vec<String>, Vec<String>) = self
            .parsed
            .project
            .dependencies
            .iter()
            .cloned()
            .partition(|dependency| predicate(dependency));

        if removed.is_empty() {
            return Ok(removed);
        }

        let array = self
            .document
            .get_or_insert_toml_array_mut(&["project"], "dependencies")?;
        array.retain(|value| {
            value
                .as_str()
                .is_none_or(|value| !removed.iter().any(|r| r == value))
        });

        self.parsed.project.dependencies = kept;
        Ok(removed)
    }

    /// Writes the manifest back to disk.
    pub fn save(&self) -> Result<(), ManifestError> {
        fs_err::write(&self.path, self.document.to_string()).map_err(|source| {
            ManifestError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        tracing::debug!("Saved manifest to {}", self.path.display());
        Ok(())
    }
}
