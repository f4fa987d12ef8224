use std::{path::PathBuf, sync::Arc};

use compy_consts::consts;
use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::WithSourceCode;

/// An error that occurred while reading or editing the TOML of a manifest.
#[derive(Error, Debug)]
pub enum TomlError {
    #[error("{}", .0.message())]
    Error(#[from] toml_edit::TomlError),
    #[error("{}", .0.message())]
    Deserialize(#[from] toml_edit::de::Error),
    #[error("Could not find or access the part '{part}' in the path '[{table_name}]'")]
    TableError { part: String, table_name: String },
    #[error("Could not find or access array '{array_name}' in '[{table_name}]'")]
    ArrayError {
        array_name: String,
        table_name: String,
    },
}

impl TomlError {
    pub fn table_error(part: &str, table_name: &str) -> Self {
        Self::TableError {
            part: part.into(),
            table_name: table_name.into(),
        }
    }

    pub fn array_error(array_name: &str, table_name: &str) -> Self {
        Self::ArrayError {
            array_name: array_name.into(),
            table_name: table_name.into(),
        }
    }
}

impl Diagnostic for TomlError {
    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = match self {
            TomlError::Error(err) => err.span(),
            TomlError::Deserialize(err) => err.span(),
            _ => None,
        }?;
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(None, SourceSpan::from(span)),
        )))
    }
}

/// An error that is returned when loading or saving a manifest file.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("'{}' not found in {}", consts::PYPROJECT_MANIFEST, .0.display())]
    #[diagnostic(help("use `compy init` to create a new project"))]
    NotFound(PathBuf),

    #[error("failed to read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Toml(#[from] Box<WithSourceCode<TomlError, NamedSource<Arc<str>>>>),
}
