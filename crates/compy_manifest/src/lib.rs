//! Access to the `pyproject.toml` manifest of a compy project.
//!
//! The manifest is kept in two shapes: a [`TomlDocument`] that is edited in
//! place so that formatting and comments survive a round trip, and a typed
//! [`PyProjectManifest`] view that is used for reading.

mod document;
mod error;
mod manifest;
mod pyproject;
pub mod template;
mod with_source_code;

pub use document::TomlDocument;
pub use error::{ManifestError, TomlError};
pub use manifest::Manifest;
pub use pyproject::{Project, PyProjectManifest, Setuptools, Tool};
pub use with_source_code::WithSourceCode;
