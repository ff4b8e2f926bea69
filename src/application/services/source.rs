//! Source cloning service
//!
//! Fetches every package of a descriptor into `<outdir>/<name>` with git or
//! the GitHub CLI. Existing checkouts are left alone.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::{load_descriptor, run_untracked};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{GitMode, PackageAction, PackageReport, SkipReason};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// Flags of one `clone_source` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    pub outdir: PathBuf,
    pub git_mode: GitMode,
    pub dry_run: bool,
    pub package_file: PathBuf,
}

pub struct SourceCloner {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl SourceCloner {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Clone each package not yet present under `outdir`.
    ///
    /// Clone failures are not reported back; only a warning is logged.
    #[instrument(skip(self), fields(mode = %opts.git_mode))]
    pub fn clone_source(&self, opts: &CloneOptions) -> ApplicationResult<PackageReport> {
        let descriptor = load_descriptor(self.fs.as_ref(), &opts.package_file)?;
        let mut report = PackageReport::default();

        for package in descriptor.names() {
            let target = opts.outdir.join(package);
            if self.fs.exists(&target) {
                debug!("clone_source: {} exists, skipping", target.display());
                report.actions.push(PackageAction::Skipped {
                    package: package.to_string(),
                    path: target,
                    reason: SkipReason::AlreadyExists,
                });
                continue;
            }

            let command = opts.git_mode.clone_command(
                &self.settings.tools,
                &self.settings.github_org,
                package,
                &target,
            );
            let package = package.to_string();
            if opts.dry_run {
                report.actions.push(PackageAction::Planned { package, command });
            } else {
                run_untracked(self.cmd.as_ref(), &command);
                report.actions.push(PackageAction::Executed { package, command });
            }
        }

        Ok(report)
    }
}
