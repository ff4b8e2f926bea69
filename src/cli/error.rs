//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use crate::exitcode;

        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Registry { .. } => exitcode::UNAVAILABLE,
                InfraError::Application(app) => match app {
                    ApplicationError::PackageFileNotFound(_)
                    | ApplicationError::ManifestNotFound(_) => exitcode::NOINPUT,
                    ApplicationError::Descriptor { .. } | ApplicationError::Domain(_) => {
                        exitcode::DATAERR
                    }
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_missing_package_file_when_exit_code_then_noinput() {
        let err: CliError = ApplicationError::PackageFileNotFound(PathBuf::from("x.yml")).into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_registry_failure_when_exit_code_then_unavailable() {
        let err: CliError = InfraError::registry("no python").into();
        assert_eq!(err.exit_code(), crate::exitcode::UNAVAILABLE);
    }
}
