use std::{
    collections::BTreeSet as Set,
    fmt,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    str::FromStr,
    time::Duration,
};

use compy_consts::consts;
use itertools::Itertools;
use miette::{IntoDiagnostic, miette};
use serde::{Deserialize, Serialize};

/// The license text that is written into a new project.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum License {
    #[default]
    #[serde(rename = "MIT")]
    #[value(name = "MIT")]
    Mit,
    #[serde(rename = "GPL3")]
    #[value(name = "GPL3")]
    Gpl3,
}

impl License {
    pub fn as_str(&self) -> &'static str {
        match self {
            License::Mit => "MIT",
            License::Gpl3 => "GPL3",
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The author that is recorded in a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
}

/// Determines the default author based on the default git author. Both the
/// name and the email address of the author are returned.
pub fn get_default_author() -> Option<(String, String)> {
    let rv = Command::new("git")
        .arg("config")
        .arg("--get-regexp")
        .arg("^user.(name|email)$")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    let mut name = None;
    let mut email = None;

    for line in std::str::from_utf8(&rv.stdout).ok()?.lines() {
        match line.split_once(' ') {
            Some(("user.email", value)) => {
                email = Some(value.to_string());
            }
            Some(("user.name", value)) => {
                name = Some(value.to_string());
            }
            _ => {}
        }
    }

    Some((name?, email.unwrap_or_default()))
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("no file was found at {0}")]
    FileNotFound(PathBuf),
    #[error("failed to read settings")]
    ReadError(#[source] std::io::Error),
    #[error("failed to parse settings of {1}: {0}")]
    ParseError(miette::Report, PathBuf),
    #[error("validation error of {1}: {0}")]
    ValidationError(miette::Report, PathBuf),
}

/// User defaults for new projects and for talking to virtual environments.
///
/// Every field is optional so that multiple settings files can be layered on
/// top of each other, the accessors fill in the built-in defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// The name of the author of new projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The email of the author of new projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// The initial version of new projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// The initial description of new projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The license of new projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    /// The interpreter used to create virtual environments.
    #[serde(alias = "python_executable")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_executable: Option<String>,

    /// Number of seconds to wait for an environment to report its installed
    /// distributions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_timeout: Option<u64>,

    #[serde(skip)]
    pub loaded_from: Vec<PathBuf>,
}

impl Config {
    /// Parses the settings from a TOML string and collects the keys that were
    /// not understood.
    pub fn from_toml(toml: &str) -> miette::Result<(Config, Set<String>)> {
        let de = toml_edit::de::Deserializer::from_str(toml).into_diagnostic()?;

        let mut unused_keys = Set::new();
        let config: Config = serde_ignored::deserialize(de, |path| {
            unused_keys.insert(path.to_string());
        })
        .into_diagnostic()?;

        Ok((config, unused_keys))
    }

    /// Load the settings from the given path.
    pub fn from_path(path: &Path) -> Result<Config, ConfigError> {
        tracing::debug!("Loading settings from {}", path.display());
        let s = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e)
                if e.kind() == std::io::ErrorKind::NotFound
                    || e.kind() == std::io::ErrorKind::NotADirectory =>
            {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ConfigError::ReadError(e)),
        };

        let (mut config, unused_keys) =
            Config::from_toml(&s).map_err(|e| ConfigError::ParseError(e, path.to_path_buf()))?;

        if !unused_keys.is_empty() {
            tracing::warn!(
                "Ignoring '{}' in {}",
                console::style(unused_keys.iter().join(", ")).yellow(),
                path.display()
            );
        }

        config
            .validate()
            .map_err(|e| ConfigError::ValidationError(e, path.to_path_buf()))?;

        config.loaded_from.push(path.to_path_buf());
        tracing::debug!("Loaded settings from: {}", path.display());

        Ok(config)
    }

    /// Validate the settings.
    pub fn validate(&self) -> miette::Result<()> {
        if self.query_timeout == Some(0) {
            return Err(miette!("'query-timeout' must be greater than zero"));
        }
        if self.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(miette!("'version' must not be empty"));
        }
        Ok(())
    }

    /// Load the settings from all the global locations, the file with the
    /// highest priority wins for every key it defines.
    pub fn load_global() -> Config {
        let mut config = Config::default();

        for p in config_path_global() {
            match Self::from_path(&p) {
                Ok(c) => config = config.merge_config(c),
                Err(ConfigError::FileNotFound(_)) => (),
                Err(e) => tracing::error!(
                    "Failed to load settings '{}' with error: {}",
                    p.display(),
                    e
                ),
            }
        }

        config
    }

    /// Merge the given settings into the current one. The values of `other`
    /// take precedence.
    pub fn merge_config(mut self, mut other: Config) -> Self {
        other.loaded_from.extend(self.loaded_from.drain(..));
        Self {
            name: other.name.or(self.name),
            email: other.email.or(self.email),
            version: other.version.or(self.version),
            description: other.description.or(self.description),
            license: other.license.or(self.license),
            python_executable: other.python_executable.or(self.python_executable),
            query_timeout: other.query_timeout.or(self.query_timeout),
            loaded_from: other.loaded_from,
        }
    }

    pub fn version(&self) -> &str {
        self.version
            .as_deref()
            .unwrap_or(consts::DEFAULT_PROJECT_VERSION)
    }

    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or(consts::DEFAULT_DESCRIPTION)
    }

    pub fn license(&self) -> License {
        self.license.unwrap_or_default()
    }

    pub fn python_executable(&self) -> &str {
        self.python_executable
            .as_deref()
            .unwrap_or(consts::DEFAULT_PYTHON_EXECUTABLE)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout.map(Duration::from_secs)
    }

    /// Returns the author of new projects, in order of priority
    ///  - the `name` and `email` settings
    ///  - the git `user.name` and `user.email`
    ///  - the `USER` environment variable
    pub fn author(&self) -> Author {
        if let Some(name) = &self.name {
            return Author {
                name: name.clone(),
                email: self.email.clone(),
            };
        }

        if let Some((name, email)) = get_default_author() {
            return Author {
                name,
                email: self
                    .email
                    .clone()
                    .or_else(|| (!email.is_empty()).then_some(email)),
            };
        }

        Author {
            name: std::env::var("USER").unwrap_or_else(|_| "Unknown".to_string()),
            email: self.email.clone(),
        }
    }
}

/// Returns the paths of the global settings files, ordered from lowest to
/// highest priority.
pub fn config_path_global() -> Vec<PathBuf> {
    vec![
        dirs::home_dir().map(|d| d.join(consts::COMPY_DIR).join(consts::CONFIG_FILE)),
        dirs::home_dir().map(|d| {
            d.join(".config")
                .join(consts::CONFIG_DIR)
                .join(consts::CONFIG_FILE)
        }),
        std::env::var_os("COMPY_HOME").map(|d| PathBuf::from(d).join(consts::CONFIG_FILE)),
    ]
    .into_iter()
    .flatten()
    .dedup()
    .collect()
}
