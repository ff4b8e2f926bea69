//! Error conversion helpers
//!
//! Attach the offending path to lower-level errors.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainError;

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.create_dir_all(&out)
    ///     .with_path_context("create output directory", &out)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Extension trait tying a descriptor or manifest parse error to the file it came from.
pub trait DescriptorResultExt<T> {
    fn in_file(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> DescriptorResultExt<T> for Result<T, DomainError> {
    fn in_file(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Descriptor {
            path: path.to_path_buf(),
            source,
        })
    }
}
