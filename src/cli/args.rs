//! CLI argument definitions using clap
//!
//! Flags shared between subcommands live in small `Args` groups that each
//! subcommand flattens in.

use std::path::PathBuf;

use clap::builder::PossibleValue;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{GitMode, InfoSelection};

/// RAIL utility scripts
#[derive(Parser, Debug)]
#[command(name = "rail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding a local .rail.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render jupyter notebooks
    #[command(name = "render_nb", visible_alias = "render-nb")]
    RenderNb {
        #[command(flatten)]
        outdir: OutdirArg,
        /// Clear Notebook output
        #[arg(long)]
        clear_output: bool,
        #[command(flatten)]
        dry_run: DryRunArg,
        /// Notebooks, or directories searched for notebooks
        /// [default: <examples_dir>/*_examples/*.ipynb]
        #[arg(value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,
    },

    /// Clone package sources
    #[command(name = "clone_source", visible_alias = "clone-source")]
    CloneSource {
        #[command(flatten)]
        outdir: OutdirArg,
        #[command(flatten)]
        git_mode: GitModeArg,
        #[command(flatten)]
        dry_run: DryRunArg,
        #[command(flatten)]
        package_file: PackageFileArg,
    },

    /// pip install rail packages one by one, to be fault tolerant
    Install {
        #[command(flatten)]
        outdir: OutdirArg,
        #[command(flatten)]
        dry_run: DryRunArg,
        /// Install from source
        #[arg(long)]
        from_source: bool,
        #[command(flatten)]
        package_file: PackageFileArg,
    },

    /// Download data files missing locally
    #[command(name = "get_data", visible_alias = "get-data")]
    GetData {
        #[command(flatten)]
        outdir: OutdirArg,
        #[command(flatten)]
        dry_run: DryRunArg,
        /// Data manifest (YAML list of local_path / remote_path)
        #[arg(long, value_hint = ValueHint::FilePath)]
        data_file: Option<PathBuf>,
    },

    /// Print information about the installed RAIL packages and stages
    Info {
        #[command(flatten)]
        flags: InfoArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutdirArg {
    /// Output directory
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub outdir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DryRunArg {
    /// Dry run only
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PackageFileArg {
    /// File with packages
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub package_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct GitModeArg {
    /// Git clone mode [default: ssh]
    #[arg(long, value_enum)]
    pub git_mode: Option<GitMode>,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct InfoArgs {
    /// Print all RAIL information
    #[arg(long)]
    pub print_all: bool,
    /// Print RAIL packages
    #[arg(long)]
    pub print_packages: bool,
    /// Print RAIL namespaces
    #[arg(long)]
    pub print_namespaces: bool,
    /// Print RAIL modules
    #[arg(long)]
    pub print_modules: bool,
    /// Print RAIL namespace tree
    #[arg(long)]
    pub print_tree: bool,
    /// Print RAIL stages
    #[arg(long)]
    pub print_stages: bool,
}

impl From<InfoArgs> for InfoSelection {
    fn from(args: InfoArgs) -> Self {
        InfoSelection {
            packages: args.print_packages,
            namespaces: args.print_namespaces,
            modules: args.print_modules,
            tree: args.print_tree,
            stages: args.print_stages,
        }
        .or_all(args.print_all)
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

impl ValueEnum for GitMode {
    fn value_variants<'a>() -> &'a [Self] {
        &GitMode::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let help = match self {
            GitMode::Ssh => "git over ssh (git@github.com:...)",
            GitMode::Https => "git over https (https://github.com/...)",
            GitMode::Cli => "GitHub CLI (gh repo clone)",
        };
        Some(PossibleValue::new(self.as_str()).help(help))
    }
}
