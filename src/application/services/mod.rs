//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, Registry)
//! but are themselves concrete structs, not traits.

mod data;
mod info;
mod install;
mod notebook;
mod source;

use std::path::Path;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, DescriptorResultExt, IoResultExt};
use crate::domain::{DataManifest, PackageDescriptor, ShellCommand};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

pub use data::{DataFetcher, FetchOptions};
pub use info::{InfoReport, InfoService};
pub use install::{InstallOptions, PackageInstaller};
pub use notebook::{NotebookRenderer, RenderOptions, KILLED, NOT_FOUND};
pub use source::{CloneOptions, SourceCloner};

/// Read and parse a package descriptor file.
pub fn load_descriptor(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<PackageDescriptor> {
    if !fs.exists(path) {
        return Err(ApplicationError::PackageFileNotFound(path.to_path_buf()));
    }
    let content = fs
        .read_to_string(path)
        .with_path_context("read package file", path)?;
    let descriptor = PackageDescriptor::parse(&content).in_file(path)?;
    debug!(
        "load_descriptor: {} packages from {}",
        descriptor.len(),
        path.display()
    );
    Ok(descriptor)
}

/// Read and parse a data manifest file.
pub fn load_manifest(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<DataManifest> {
    if !fs.exists(path) {
        return Err(ApplicationError::ManifestNotFound(path.to_path_buf()));
    }
    let content = fs
        .read_to_string(path)
        .with_path_context("read data manifest", path)?;
    let manifest = DataManifest::parse(&content).in_file(path)?;
    debug!(
        "load_manifest: {} files from {}",
        manifest.len(),
        path.display()
    );
    Ok(manifest)
}

/// Run a command whose outcome is not tracked; failures are only logged.
fn run_untracked(cmd: &dyn CommandRunner, command: &ShellCommand) {
    match cmd.status(&command.program, &command.args_str()) {
        Ok(Some(0)) => {}
        Ok(Some(code)) => warn!("`{}` exited with {}", command, code),
        Ok(None) => warn!("`{}` was terminated by a signal", command),
        Err(e) => warn!("cannot run `{}`: {}", command, e),
    }
}
