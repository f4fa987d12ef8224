use std::{collections::BTreeSet, path::Path};

use compy_consts::consts;
use miette::Diagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::is_stdlib_module;

/// An error that occurred while scanning a source tree.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    #[error("failed to walk the directory '{}'", .path.display())]
    Walk {
        path: std::path::PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Read(#[from] std::io::Error),
}

/// Returns the top-level module that an import line refers to.
///
/// `import numpy.linalg as la` and `from numpy.linalg import norm` both
/// yield `numpy`. Relative imports and lines that are not an import yield
/// `None`.
pub fn imported_module(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("import ")
        .or_else(|| line.strip_prefix("from "))?;
    let token = rest.split_whitespace().next()?;
    let module = token.split(['.', ',', ';']).next()?;
    (!module.is_empty()).then_some(module)
}

/// Returns all the top-level modules imported by a piece of source code.
pub fn scan_source(source: &str) -> impl Iterator<Item = &str> {
    source.lines().filter_map(imported_module)
}

/// Returns true if the path has an extension of a Python source file.
pub fn is_python_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| consts::PYTHON_SOURCE_EXTENSIONS.contains(&ext))
}

/// Recursively scans all Python sources below `root` and returns the modules
/// they import, without the modules of the standard library.
pub fn find_imports(root: &Path) -> Result<BTreeSet<String>, ScanError> {
    let mut found = BTreeSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: source.path().unwrap_or(root).to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_python_source(entry.path()) {
            continue;
        }

        let source = fs_err::read_to_string(entry.path())?;
        let before = found.len();
        found.extend(scan_source(&source).map(str::to_string));
        tracing::trace!(
            "scanned {} ({} new imports)",
            entry.path().display(),
            found.len() - before
        );
    }

    found.retain(|module| !is_stdlib_module(module));
    tracing::debug!("found {} imports below {}", found.len(), root.display());
    Ok(found)
}
