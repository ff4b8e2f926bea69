//! Command dispatch: turns parsed arguments into service calls and prints results

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{
    CloneOptions, FetchOptions, InfoReport, InstallOptions, RenderOptions,
};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{InfoSelection, PackageAction, PackageReport, RenderReport, SkipReason};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Load settings, wire services, run the selected subcommand.
///
/// Returns the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("get current directory", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    debug!("settings: {:?}", settings);

    let container = ServiceContainer::new(settings);
    let mut out = io::stdout().lock();
    dispatch(&container, &cli.command, &project_dir, &mut out)
}

/// Run one subcommand against an already wired container, printing to `out`.
pub fn dispatch(
    container: &ServiceContainer,
    command: &Commands,
    project_dir: &Path,
    out: &mut impl Write,
) -> CliResult<i32> {
    let settings = &container.settings;
    match command {
        Commands::RenderNb {
            outdir,
            clear_output,
            dry_run,
            inputs,
        } => {
            let opts = RenderOptions {
                outdir: outdir.outdir.clone().unwrap_or_else(|| settings.docs_dir.clone()),
                clear_output: *clear_output,
                dry_run: dry_run.dry_run,
            };
            render_nb(container, &opts, inputs, out)
        }
        Commands::CloneSource {
            outdir,
            git_mode,
            dry_run,
            package_file,
        } => {
            let opts = CloneOptions {
                outdir: outdir
                    .outdir
                    .clone()
                    .unwrap_or_else(|| settings.source_dir.clone()),
                git_mode: git_mode.git_mode.unwrap_or(settings.git_mode),
                dry_run: dry_run.dry_run,
                package_file: package_file
                    .package_file
                    .clone()
                    .unwrap_or_else(|| settings.package_file.clone()),
            };
            clone_source(container, &opts, out)
        }
        Commands::Install {
            outdir,
            dry_run,
            from_source,
            package_file,
        } => {
            let opts = InstallOptions {
                outdir: outdir
                    .outdir
                    .clone()
                    .unwrap_or_else(|| settings.source_dir.clone()),
                from_source: *from_source,
                dry_run: dry_run.dry_run,
                package_file: package_file
                    .package_file
                    .clone()
                    .unwrap_or_else(|| settings.package_file.clone()),
            };
            install(container, &opts, out)
        }
        Commands::GetData {
            outdir,
            dry_run,
            data_file,
        } => {
            let opts = FetchOptions {
                data_file: data_file
                    .clone()
                    .unwrap_or_else(|| settings.data_file.clone()),
                root: outdir.outdir.clone(),
                dry_run: dry_run.dry_run,
            };
            get_data(container, &opts, out)
        }
        Commands::Info { flags } => info(container, InfoSelection::from(*flags), out),
        Commands::Config { command } => config(container, command, project_dir, out),
        Commands::Completion { shell } => {
            completion(*shell, out);
            Ok(exitcode::OK)
        }
    }
}

fn write_err(e: io::Error) -> CliError {
    InfraError::io("write output", e).into()
}

#[instrument(skip(container, out))]
fn render_nb(
    container: &ServiceContainer,
    opts: &RenderOptions,
    inputs: &[PathBuf],
    out: &mut impl Write,
) -> CliResult<i32> {
    let report = container.notebook_renderer().render(opts, inputs)?;
    print_render_report(out, &report, opts.dry_run).map_err(write_err)?;
    Ok(report.status())
}

fn print_render_report(
    out: &mut impl Write,
    report: &RenderReport,
    dry_run: bool,
) -> io::Result<()> {
    for dir in &report.created_dirs {
        output::action(out, "Created", &dir.display())?;
    }
    if dry_run {
        for job in &report.jobs {
            output::info(out, &job.command)?;
        }
    }
    for job in &report.jobs {
        let line = format!("{} {}", job.notebook.display(), job.outcome);
        if job.outcome == 0 {
            output::success(out, &line)?;
        } else {
            output::failure(out, &line)?;
        }
    }
    let failed = report.failures().count();
    if failed > 0 {
        output::failure(
            out,
            &format!("{failed} of {} notebooks failed", report.jobs.len()),
        )?;
    }
    Ok(())
}

#[instrument(skip(container, out))]
fn clone_source(
    container: &ServiceContainer,
    opts: &CloneOptions,
    out: &mut impl Write,
) -> CliResult<i32> {
    let report = container.source_cloner().clone_source(opts)?;
    print_package_report(out, &report).map_err(write_err)?;
    Ok(exitcode::OK)
}

#[instrument(skip(container, out))]
fn install(
    container: &ServiceContainer,
    opts: &InstallOptions,
    out: &mut impl Write,
) -> CliResult<i32> {
    let report = container.package_installer().install(opts)?;
    print_package_report(out, &report).map_err(write_err)?;
    Ok(exitcode::OK)
}

#[instrument(skip(container, out))]
fn get_data(
    container: &ServiceContainer,
    opts: &FetchOptions,
    out: &mut impl Write,
) -> CliResult<i32> {
    let report = container.data_fetcher().fetch(opts)?;
    print_package_report(out, &report).map_err(write_err)?;
    Ok(exitcode::OK)
}

fn print_package_report(out: &mut impl Write, report: &PackageReport) -> io::Result<()> {
    for action in &report.actions {
        match action {
            PackageAction::Skipped { path, reason, .. } => {
                let label = match reason {
                    SkipReason::AlreadyExists => "Skipping existing",
                    SkipReason::MissingSource => "Skipping missing",
                };
                output::skip(out, label, &path.display())?;
            }
            PackageAction::Planned { command, .. } => output::info(out, command)?,
            PackageAction::Executed { command, .. } => output::action(out, "Ran", command)?,
        }
    }
    Ok(())
}

#[instrument(skip(container, out))]
fn info(
    container: &ServiceContainer,
    selection: InfoSelection,
    out: &mut impl Write,
) -> CliResult<i32> {
    let reports = container.info_service().collect(selection)?;
    print_info_reports(out, &reports).map_err(write_err)?;
    Ok(exitcode::OK)
}

fn print_info_reports(out: &mut impl Write, reports: &[InfoReport]) -> io::Result<()> {
    for report in reports {
        output::banner(out, report.title())?;
        for line in &report.lines {
            output::info(out, line)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
    out: &mut impl Write,
) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::info(out, &container.settings.to_toml()?).map_err(write_err)?;
        }
        ConfigCommands::Path => {
            let global = global_config_path();
            let local = local_config_path(project_dir);
            match &global {
                Some(path) => {
                    print_config_path(out, "global", path, container).map_err(write_err)?
                }
                None => output::warning("no home directory; global config disabled"),
            }
            print_config_path(out, "local", &local, container).map_err(write_err)?;
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action(out, "Created", &path.display()).map_err(write_err)?;
        }
    }
    Ok(exitcode::OK)
}

fn print_config_path(
    out: &mut impl Write,
    label: &str,
    path: &Path,
    container: &ServiceContainer,
) -> io::Result<()> {
    let state = if container.fs.exists(path) {
        "exists"
    } else {
        "not found"
    };
    output::info(out, &format!("{label}: {} ({state})", path.display()))
}

fn completion(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}
