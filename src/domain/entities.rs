//! Domain entities: core data structures

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selects how a package's source is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitMode {
    /// `git clone git@github.com:<org>/<pkg>.git`
    #[default]
    Ssh,
    /// `git clone https://github.com/<org>/<pkg>.git`
    Https,
    /// `gh repo clone <org>/<pkg>`
    Cli,
}

impl GitMode {
    pub const ALL: [GitMode; 3] = [GitMode::Ssh, GitMode::Https, GitMode::Cli];

    pub fn as_str(self) -> &'static str {
        match self {
            GitMode::Ssh => "ssh",
            GitMode::Https => "https",
            GitMode::Cli => "cli",
        }
    }

    /// Build the command fetching `package` from `org` into `target`.
    pub fn clone_command(
        self,
        tools: &Toolchain,
        org: &str,
        package: &str,
        target: &std::path::Path,
    ) -> ShellCommand {
        let target = target.display().to_string();
        match self {
            GitMode::Ssh => ShellCommand::tool(&tools.git)
                .arg("clone")
                .arg(format!("git@github.com:{org}/{package}.git"))
                .arg(target),
            GitMode::Https => ShellCommand::tool(&tools.git)
                .arg("clone")
                .arg(format!("https://github.com/{org}/{package}.git"))
                .arg(target),
            GitMode::Cli => ShellCommand::tool(&tools.gh)
                .args(["repo", "clone"])
                .arg(format!("{org}/{package}"))
                .arg(target),
        }
    }
}

impl fmt::Display for GitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GitMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown git mode '{s}' (expected ssh, https or cli)"))
    }
}

/// Program names of the external tools being driven.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Toolchain {
    pub git: String,
    pub gh: String,
    pub pip: String,
    pub jupyter: String,
    pub python: String,
    pub curl: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            git: "git".into(),
            gh: "gh".into(),
            pip: "pip".into(),
            jupyter: "jupyter".into(),
            python: "python".into(),
            curl: "curl".into(),
        }
    }
}

/// An external program invocation. Executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Start from a configured tool, which may carry leading arguments
    /// (`python -m pip`, `uv pip`).
    pub fn tool(spec: &str) -> Self {
        let mut words = spec.split_whitespace();
        let program = words.next().unwrap_or_default();
        Self::new(program).args(words)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn args_str(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> std::borrow::Cow<'_, str> {
    if !word.is_empty() && !word.chars().any(|c| c.is_whitespace() || c == '\'') {
        return word.into();
    }
    format!("'{}'", word.replace('\'', r"'\''")).into()
}

/// Outcome of rendering (or clearing) one notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookJob {
    pub notebook: PathBuf,
    pub output_dir: PathBuf,
    pub command: ShellCommand,
    /// Exit code of the converter; 0 in dry-run mode
    pub outcome: i32,
}

/// Per-notebook results, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Output directories that did not exist before this run
    pub created_dirs: Vec<PathBuf>,
    pub jobs: Vec<NotebookJob>,
}

impl RenderReport {
    /// First non-zero outcome, 0 if every notebook succeeded.
    pub fn status(&self) -> i32 {
        aggregate_outcomes(self.jobs.iter().map(|job| job.outcome))
    }

    pub fn failures(&self) -> impl Iterator<Item = &NotebookJob> {
        self.jobs.iter().filter(|job| job.outcome != 0)
    }
}

/// Fold outcome codes: once a failure is seen it sticks.
pub fn aggregate_outcomes(outcomes: impl IntoIterator<Item = i32>) -> i32 {
    outcomes.into_iter().find(|code| *code != 0).unwrap_or(0)
}

/// Why a package was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Clone target or data file already present
    AlreadyExists,
    /// Source checkout missing for a from-source install
    MissingSource,
}

/// What happened to one descriptor or data manifest entry.
///
/// `package` is the package name, or the local path for a data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageAction {
    Skipped {
        package: String,
        path: PathBuf,
        reason: SkipReason,
    },
    /// Dry run: command printed only
    Planned {
        package: String,
        command: ShellCommand,
    },
    /// Command was run; its exit status is not tracked
    Executed {
        package: String,
        command: ShellCommand,
    },
}

impl PackageAction {
    pub fn command(&self) -> Option<&ShellCommand> {
        match self {
            PackageAction::Skipped { .. } => None,
            PackageAction::Planned { command, .. } | PackageAction::Executed { command, .. } => {
                Some(command)
            }
        }
    }
}

/// Clone, install or fetch results, one action per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReport {
    pub actions: Vec<PackageAction>,
}

impl PackageReport {
    pub fn commands(&self) -> impl Iterator<Item = &ShellCommand> {
        self.actions.iter().filter_map(PackageAction::command)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &PackageAction> {
        self.actions
            .iter()
            .filter(|a| matches!(a, PackageAction::Skipped { .. }))
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Unknown variables leave the input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
