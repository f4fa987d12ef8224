//! # compy
//!
//! Scaffolds Python projects and keeps their declared dependencies in sync
//! with what the sources actually import.

pub mod cli;
pub mod dependencies;
pub mod git;
pub mod init;
pub mod interface;
pub mod project;
pub mod scripts;
pub mod tidy;

pub use interface::Interface;
pub use project::Project;
