//! Data fetching service
//!
//! Downloads the files of a data manifest that are not present locally.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{load_manifest, run_untracked};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{PackageAction, PackageReport, SkipReason};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// Flags of one `get_data` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub data_file: PathBuf,
    /// Directory relative local paths are resolved against; as written when unset
    pub root: Option<PathBuf>,
    pub dry_run: bool,
}

pub struct DataFetcher {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl DataFetcher {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Fetch every manifest file missing locally.
    ///
    /// Download failures are not reported back; only a warning is logged.
    #[instrument(skip(self))]
    pub fn fetch(&self, opts: &FetchOptions) -> ApplicationResult<PackageReport> {
        let manifest = load_manifest(self.fs.as_ref(), &opts.data_file)?;
        let mut report = PackageReport::default();

        for file in manifest.files() {
            let local = match &opts.root {
                Some(root) => root.join(&file.local_path),
                None => file.local_path.clone(),
            };
            info!("check file: {}", local.display());

            if self.fs.exists(&local) {
                debug!("fetch: {} exists, skipping", local.display());
                report.actions.push(PackageAction::Skipped {
                    package: local.display().to_string(),
                    path: local,
                    reason: SkipReason::AlreadyExists,
                });
                continue;
            }

            let command = file.fetch_command(&self.settings.tools.curl, &local);
            let package = local.display().to_string();
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
