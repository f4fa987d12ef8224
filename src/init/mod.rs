//! Scaffolding of new projects.

mod license;

use std::path::{Path, PathBuf};

use chrono::Datelike;
use compy_config::{Author, License};
use compy_consts::consts;
use compy_environment::{EnvironmentError, VirtualEnv};
use compy_manifest::template::PyProjectTemplate;
use miette::Diagnostic;
use thiserror::Error;

pub use license::render_license;

use crate::{Interface, git::GitError};

const GITIGNORE_TEMPLATE: &str = r#"**/__pycache__/
.venv/
.vscode/
*.egg-info/
"#;

#[derive(Debug, Error, Diagnostic)]
pub enum InitError {
    #[error("cannot derive a project name from '{}'", .0.display())]
    #[diagnostic(help("pass the name with `--project-name`"))]
    NoProjectName(PathBuf),

    #[error("failed to render {0}")]
    Render(&'static str, #[source] minijinja::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to set up the virtual environment")]
    Venv(
        #[source]
        #[diagnostic_source]
        EnvironmentError,
    ),

    #[error("failed to initialize the git repository")]
    Git(
        #[source]
        #[diagnostic_source]
        GitError,
    ),
}

/// Everything that goes into a new project.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub path: PathBuf,
    /// Defaults to the name of the project directory.
    pub name: Option<String>,
    pub author: Author,
    pub license: License,
    pub version: String,
    pub description: String,
    pub python_executable: String,
    pub create_venv: bool,
    pub init_git: bool,
}

/// Creates a new project, or completes an existing one. Files that already
/// exist are left alone.
///
/// Returns the root directory of the project.
pub async fn init_project<I: Interface>(
    options: InitOptions,
    interface: &I,
) -> Result<PathBuf, InitError> {
    fs_err::create_dir_all(&options.path)?;
    let dir = dunce::canonicalize(&options.path)?;
    let name = match options.name {
        Some(name) => name,
        None => name_from_dir(&dir)?,
    };
    interface.message(&format!(
        "Initializing project {}",
        consts::PACKAGE_STYLE.apply_to(&name)
    ));

    let manifest_path = dir.join(consts::PYPROJECT_MANIFEST);
    if manifest_path.exists() {
        interface.warning(&format!("{} already exists", consts::PYPROJECT_MANIFEST));
    } else {
        let manifest = PyProjectTemplate {
            name: &name,
            author: &options.author.name,
            email: options.author.email.as_deref(),
            version: &options.version,
            description: &options.description,
        }
        .render()
        .map_err(|e| InitError::Render(consts::PYPROJECT_MANIFEST, e))?;
        fs_err::write(&manifest_path, manifest)?;
    }

    let package_dir = dir.join(&name);
    fs_err::create_dir_all(&package_dir)?;
    touch(&package_dir.join(consts::INIT_FILE))?;

    write_unless_exists(
        &dir.join(consts::README_FILE),
        || Ok(format!("# {name}\n")),
        interface,
    )?;

    write_unless_exists(
        &dir.join(consts::LICENSE_FILE),
        || {
            let year = chrono::Local::now().year();
            render_license(options.license, &name, &options.author.name, year)
                .map_err(|e| InitError::Render(consts::LICENSE_FILE, e))
        },
        interface,
    )?;

    if options.create_venv {
        let venv_dir = dir.join(consts::VENV_DIR);
        let venv = if venv_dir.exists() {
            interface.warning("Virtual environment already exists");
            VirtualEnv::new(venv_dir)
        } else {
            interface.message(&format!(
                "Creating virtual environment with {}",
                options.python_executable
            ));
            VirtualEnv::create(venv_dir, &options.python_executable)
                .await
                .map_err(InitError::Venv)?
        };
        venv.install_editable(&dir).await.map_err(InitError::Venv)?;
    }

    write_unless_exists(
        &dir.join(consts::GITIGNORE_FILE),
        || Ok(GITIGNORE_TEMPLATE.to_string()),
        interface,
    )?;

    if options.init_git {
        if dir.join(consts::GIT_DIR).exists() {
            interface.warning("Git repository already initialized");
        } else {
            crate::git::init_repository(&dir)
                .await
                .map_err(InitError::Git)?;
        }
    }

    interface.success(&format!(
        "Initialized project in {}",
        consts::PATH_STYLE.apply_to(dir.display())
    ));
    Ok(dir)
}

fn name_from_dir(path: &Path) -> Result<String, InitError> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| InitError::NoProjectName(path.to_path_buf()))
}

/// Creates an empty file, an existing file is not modified.
fn touch(path: &Path) -> std::io::Result<()> {
    fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(())
}

fn write_unless_exists<I: Interface>(
    path: &Path,
    contents: impl FnOnce() -> Result<String, InitError>,
    interface: &I,
) -> Result<(), InitError> {
    if path.exists() {
        let file_name = path.file_name().unwrap_or(path.as_os_str());
        interface.warning(&format!("{} already exists", file_name.to_string_lossy()));
        return Ok(());
    }
    fs_err::write(path, contents()?)?;
    Ok(())
}
