//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent violations of the data model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid package name {name:?}: {reason}")]
    InvalidPackageName { name: String, reason: &'static str },

    #[error("invalid package descriptor: {message}")]
    InvalidDescriptor { message: String },

    #[error("invalid specifier for package {name:?}: expected a scalar value")]
    InvalidSpecifier { name: String },

    #[error("notebook path has no file name: {0}")]
    InvalidNotebookPath(PathBuf),

    #[error("invalid data manifest: {message}")]
    InvalidManifest { message: String },
}
