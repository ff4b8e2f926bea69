//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rail/rail.toml`
//! 3. Local config: `<project_dir>/.rail.toml`
//! 4. Environment variables: `RAIL_*` prefix (`RAIL_TOOLS__PIP=uv pip` style for nested keys)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, GitMode, Toolchain};

/// Unified configuration for rail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// GitHub organization hosting the packages (default: LSSTDESC)
    pub github_org: String,
    /// Package descriptor used when `--package-file` is absent
    pub package_file: PathBuf,
    /// Where package sources are cloned to / installed from (default: ..)
    pub source_dir: PathBuf,
    /// Where rendered notebooks go (default: docs)
    pub docs_dir: PathBuf,
    /// Searched as `<examples_dir>/*_examples/*.ipynb` when render_nb gets no inputs
    pub examples_dir: PathBuf,
    /// Data manifest used when `get_data --data-file` is absent
    pub data_file: PathBuf,
    /// Clone mode used when `--git-mode` is absent
    pub git_mode: GitMode,
    /// External program names
    pub tools: Toolchain,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_org: "LSSTDESC".into(),
            package_file: PathBuf::from("rail_packages.yml"),
            source_dir: PathBuf::from(".."),
            docs_dir: PathBuf::from("docs"),
            examples_dir: PathBuf::from("examples"),
            data_file: PathBuf::from("rail_data.yml"),
            git_mode: GitMode::Ssh,
            tools: Toolchain::default(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub github_org: Option<String>,
    pub package_file: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub docs_dir: Option<PathBuf>,
    pub examples_dir: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub git_mode: Option<GitMode>,
    pub tools: RawToolchain,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawToolchain {
    pub git: Option<String>,
    pub gh: Option<String>,
    pub pip: Option<String>,
    pub jupyter: Option<String>,
    pub python: Option<String>,
    pub curl: Option<String>,
}

/// Get the XDG config directory for rail.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rail").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rail.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".rail.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        for path in [
            &mut self.package_file,
            &mut self.source_dir,
            &mut self.docs_dir,
            &mut self.examples_dir,
            &mut self.data_file,
        ] {
            *path = PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()));
        }
        for tool in [
            &mut self.tools.git,
            &mut self.tools.gh,
            &mut self.tools.pip,
            &mut self.tools.jupyter,
            &mut self.tools.python,
            &mut self.tools.curl,
        ] {
            *tool = expand_env_vars(tool);
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let tools = &overlay.tools;
        Self {
            github_org: overlay
                .github_org
                .clone()
                .unwrap_or_else(|| self.github_org.clone()),
            package_file: overlay
                .package_file
                .clone()
                .unwrap_or_else(|| self.package_file.clone()),
            source_dir: overlay
                .source_dir
                .clone()
                .unwrap_or_else(|| self.source_dir.clone()),
            docs_dir: overlay
                .docs_dir
                .clone()
                .unwrap_or_else(|| self.docs_dir.clone()),
            examples_dir: overlay
                .examples_dir
                .clone()
                .unwrap_or_else(|| self.examples_dir.clone()),
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            git_mode: overlay.git_mode.unwrap_or(self.git_mode),
            tools: Toolchain {
                git: tools.git.clone().unwrap_or_else(|| self.tools.git.clone()),
                gh: tools.gh.clone().unwrap_or_else(|| self.tools.gh.clone()),
                pip: tools.pip.clone().unwrap_or_else(|| self.tools.pip.clone()),
                jupyter: tools
                    .jupyter
                    .clone()
                    .unwrap_or_else(|| self.tools.jupyter.clone()),
                python: tools
                    .python
                    .clone()
                    .unwrap_or_else(|| self.tools.python.clone()),
                curl: tools.curl.clone().unwrap_or_else(|| self.tools.curl.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.rail.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply RAIL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RAIL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("github_org") {
            settings.github_org = val;
        }
        if let Ok(val) = config.get_string("package_file") {
            settings.package_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("source_dir") {
            settings.source_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("docs_dir") {
            settings.docs_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("examples_dir") {
            settings.examples_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("git_mode") {
            settings.git_mode = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("RAIL_GIT_MODE: {e}"),
            })?;
        }
        for (key, slot) in [
            ("tools.git", &mut settings.tools.git),
            ("tools.gh", &mut settings.tools.gh),
            ("tools.pip", &mut settings.tools.pip),
            ("tools.jupyter", &mut settings.tools.jupyter),
            ("tools.python", &mut settings.tools.python),
            ("tools.curl", &mut settings.tools.curl),
        ] {
            if let Ok(val) = config.get_string(key) {
                *slot = val;
            }
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rail configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rail/rail.toml
#   Local:  ./.rail.toml
#   Env:    RAIL_* environment variables (RAIL_TOOLS__PIP for [tools] pip)

# GitHub organization the packages are cloned from
# github_org = "LSSTDESC"

# Package descriptor (YAML mapping: package name -> pip specifier)
# package_file = "rail_packages.yml"

# Directory holding package checkouts (clone_source / install --from-source)
# source_dir = ".."

# Output directory for render_nb
# docs_dir = "docs"

# render_nb without inputs renders <examples_dir>/*_examples/*.ipynb
# examples_dir = "examples"

# Data manifest for get_data (YAML list of local_path / remote_path entries)
# data_file = "rail_data.yml"

# Default clone mode: ssh, https or cli
# git_mode = "ssh"

[tools]
# git = "git"
# gh = "gh"
# pip = "pip"
# jupyter = "jupyter"
# python = "python"
# curl = "curl"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
