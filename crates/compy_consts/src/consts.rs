use std::sync::LazyLock;

use console::Style;

pub const PYPROJECT_MANIFEST: &str = "pyproject.toml";
pub const VENV_DIR: &str = ".venv";
pub const LICENSE_FILE: &str = "LICENSE";
pub const README_FILE: &str = "README.md";
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const GIT_DIR: &str = ".git";
pub const INIT_FILE: &str = "__init__.py";
pub const SCRIPTS_DIR: &str = "scripts";
pub const DEFAULT_SCRIPT: &str = "main";

pub const COMPY_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMPY_DIR: &str = ".compy";
pub const CONFIG_DIR: &str = "compy";
pub const CONFIG_FILE: &str = "settings.toml";

pub const DEFAULT_PROJECT_VERSION: &str = "0.1.0";
pub const DEFAULT_DESCRIPTION: &str = "A Python project";
pub const DEFAULT_PYTHON_EXECUTABLE: &str = "python3";

/// File extensions the import scanner treats as Python source.
pub const PYTHON_SOURCE_EXTENSIONS: &[&str] = &["py", "pyw"];

pub const CLAP_GLOBAL_OPTIONS: &str = "Global Options";
pub const CLAP_INIT_OPTIONS: &str = "Project Options";

pub static DEPENDENCY_STYLE: LazyLock<Style> = LazyLock::new(|| Style::new().cyan());
pub static PACKAGE_STYLE: LazyLock<Style> = LazyLock::new(|| Style::new().magenta());
pub static PATH_STYLE: LazyLock<Style> = LazyLock::new(|| Style::new().bold());
