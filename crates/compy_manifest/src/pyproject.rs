use indexmap::IndexMap;
use serde::Deserialize;

use crate::TomlError;

/// The typed view of the parts of a `pyproject.toml` that compy reads.
///
/// Any other table or key in the file is ignored.
#[derive(Deserialize, Debug, Clone)]
pub struct PyProjectManifest {
    pub project: Project,
    #[serde(default)]
    pub tool: Option<Tool>,
}

/// The `[project]` table.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Tool {
    #[serde(default)]
    pub setuptools: Option<Setuptools>,
}

/// The `[tool.setuptools]` table.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Setuptools {
    /// Maps the packages of the project to their directory relative to the
    /// project root.
    #[serde(default)]
    pub package_dir: IndexMap<String, String>,
}

impl PyProjectManifest {
    /// Parses a toml string into a PyProjectManifest
    pub fn from_toml_str(source: &str) -> Result<Self, TomlError> {
        toml_edit::de::from_str(source).map_err(TomlError::from)
    }

    /// The packages of the project and their directories, in the order they
    /// were declared.
    pub fn package_dir(&self) -> Option<&IndexMap<String, String>> {
        self.tool
            .as_ref()
            .and_then(|t| t.setuptools.as_ref())
            .map(|s| &s.package_dir)
    }
}
