//! Package installation service
//!
//! pip-installs the packages of a descriptor one by one, so that one broken
//! package does not stop the others.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::{load_descriptor, run_untracked};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{PackageAction, PackageReport, ShellCommand, SkipReason};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// Flags of one `install` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Directory holding the source checkouts
    pub outdir: PathBuf,
    /// Editable install from `<outdir>/<name>` instead of the index
    pub from_source: bool,
    pub dry_run: bool,
    pub package_file: PathBuf,
}

pub struct PackageInstaller {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl PackageInstaller {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    #[instrument(skip(self))]
    pub fn install(&self, opts: &InstallOptions) -> ApplicationResult<PackageReport> {
        let descriptor = load_descriptor(self.fs.as_ref(), &opts.package_file)?;
        let mut report = PackageReport::default();

        for (package, specifier) in descriptor.iter() {
            let pip = ShellCommand::tool(&self.settings.tools.pip).arg("install");
            let command = if opts.from_source {
                let source = opts.outdir.join(package);
                if !self.fs.exists(&source) {
                    debug!("install: {} missing, skipping", source.display());
                    report.actions.push(PackageAction::Skipped {
                        package: package.to_string(),
                        path: source,
                        reason: SkipReason::MissingSource,
                    });
                    continue;
                }
                pip.arg("-e").arg(source.display().to_string())
            } else {
                pip.arg(specifier)
            };

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
