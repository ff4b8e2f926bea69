//! Notebook rendering service
//!
//! Drives `jupyter nbconvert` once per notebook, either clearing stored
//! outputs in place or executing the notebook into an HTML page under
//! `<outdir>/<notebook parent dir name>/<stem>.html`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{DomainError, NotebookJob, RenderReport, ShellCommand};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// Exit code recorded when the converter cannot be started (shell convention).
pub const NOT_FOUND: i32 = 127;

/// Exit code recorded when the converter was killed by a signal.
pub const KILLED: i32 = 1;

/// Flags of one `render_nb` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub outdir: PathBuf,
    /// Clear stored outputs instead of executing
    pub clear_output: bool,
    pub dry_run: bool,
}

/// Renders notebooks to HTML through the external converter.
pub struct NotebookRenderer {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl NotebookRenderer {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Output directory for a notebook: `<outdir>/<name of its parent dir>`.
    pub fn output_dir(outdir: &Path, notebook: &Path) -> PathBuf {
        match notebook.parent().and_then(Path::file_name) {
            Some(subdir) => outdir.join(subdir),
            None => outdir.to_path_buf(),
        }
    }

    /// Replace directory inputs by the notebooks below them.
    pub fn expand_inputs(&self, inputs: &[PathBuf]) -> ApplicationResult<Vec<PathBuf>> {
        let mut notebooks = Vec::new();
        for input in inputs {
            if self.fs.is_dir(input) {
                let found = self
                    .fs
                    .find_files(input, "ipynb")
                    .with_path_context("search notebooks", input)?;
                debug!("expand_inputs: {} -> {} notebooks", input.display(), found.len());
                notebooks.extend(found);
            } else {
                notebooks.push(input.clone());
            }
        }
        Ok(notebooks)
    }

    /// Notebooks rendered when no input is given: `<examples_dir>/*_examples/*.ipynb`.
    pub fn default_inputs(&self) -> ApplicationResult<Vec<PathBuf>> {
        let examples = self.settings.examples_dir.as_path();
        if !self.fs.is_dir(examples) {
            debug!("default_inputs: {} is not a directory", examples.display());
            return Ok(Vec::new());
        }
        let found = self
            .fs
            .find_files(examples, "ipynb")
            .with_path_context("search notebooks", examples)?;
        Ok(found
            .into_iter()
            .filter(|notebook| {
                let subdir = notebook.parent();
                subdir.and_then(Path::parent) == Some(examples)
                    && subdir
                        .and_then(Path::file_name)
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.ends_with("_examples"))
            })
            .collect())
    }

    /// Converter invocation for one notebook.
    pub fn command(
        &self,
        opts: &RenderOptions,
        notebook: &Path,
        output_dir: &Path,
    ) -> ApplicationResult<ShellCommand> {
        let base = ShellCommand::tool(&self.settings.tools.jupyter).arg("nbconvert");
        let notebook_arg = notebook.display().to_string();

        if opts.clear_output {
            return Ok(base.arg("--clear-output").arg(notebook_arg));
        }

        let stem = notebook
            .file_stem()
            .ok_or_else(|| DomainError::InvalidNotebookPath(notebook.to_path_buf()))?;
        Ok(base
            .args(["--to", "html"])
            .arg("--output-dir")
            .arg(output_dir.display().to_string())
            .arg("--output")
            .arg(stem.to_string_lossy())
            .arg("--execute")
            .arg(notebook_arg))
    }

    /// Render (or clear) every input; the report's status is the first failure.
    ///
    /// Without inputs the example notebooks are rendered.
    pub fn render(
        &self,
        opts: &RenderOptions,
        inputs: &[PathBuf],
    ) -> ApplicationResult<RenderReport> {
        let mut report = RenderReport::default();

        let notebooks = if inputs.is_empty() {
            self.default_inputs()?
        } else {
            self.expand_inputs(inputs)?
        };

        for notebook in notebooks {
            let output_dir = Self::output_dir(&opts.outdir, &notebook);
            if !self.fs.is_dir(&output_dir) {
                self.fs
                    .create_dir_all(&output_dir)
                    .with_path_context("create output directory", &output_dir)?;
                report.created_dirs.push(output_dir.clone());
            }

            let command = self.command(opts, &notebook, &output_dir)?;
            let outcome = if opts.dry_run {
                0
            } else {
                self.run(&command)
            };
            debug!("render: {} -> {}", notebook.display(), outcome);

            report.jobs.push(NotebookJob {
                notebook,
                output_dir,
                command,
                outcome,
            });
        }

        Ok(report)
    }

    fn run(&self, command: &ShellCommand) -> i32 {
        match self.cmd.status(&command.program, &command.args_str()) {
            Ok(Some(code)) => code,
            Ok(None) => {
                warn!("{} was terminated by a signal", command.program);
                KILLED
            }
            Err(e) => {
                warn!("cannot run {}: {}", command.program, e);
                NOT_FOUND
            }
        }
    }
}
