//! Tests for command line parsing

use std::path::PathBuf;

use clap::Parser;
use rstest::rstest;

use rail_hub::cli::args::{Cli, Commands, ConfigCommands};
use rail_hub::domain::{GitMode, InfoSelection};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args.iter().copied()).unwrap_or_else(|e| panic!("parse {args:?}: {e}"))
}

#[rstest]
#[case("render_nb")]
#[case("render-nb")]
fn given_render_nb_when_parsed_then_flags_and_inputs(#[case] name: &str) {
    let cli = parse(&[
        "rail",
        name,
        "--outdir",
        "out",
        "--clear-output",
        "--dry-run",
        "a.ipynb",
        "examples",
    ]);

    match cli.command {
        Commands::RenderNb {
            outdir,
            clear_output,
            dry_run,
            inputs,
        } => {
            assert_eq!(outdir.outdir, Some(PathBuf::from("out")));
            assert!(clear_output);
            assert!(dry_run.dry_run);
            assert_eq!(
                inputs,
                vec![PathBuf::from("a.ipynb"), PathBuf::from("examples")]
            );
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[rstest]
#[case("ssh", GitMode::Ssh)]
#[case("https", GitMode::Https)]
#[case("cli", GitMode::Cli)]
fn given_git_mode_value_when_parsed_then_mode(#[case] value: &str, #[case] expected: GitMode) {
    let cli = parse(&["rail", "clone-source", "--git-mode", value]);

    match cli.command {
        Commands::CloneSource { git_mode, .. } => {
            assert_eq!(git_mode.git_mode, Some(expected));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn given_unknown_git_mode_when_parsed_then_error() {
    let result = Cli::try_parse_from(["rail", "clone_source", "--git-mode", "ftp"]);
    assert!(result.is_err());
}

#[test]
fn given_clone_source_without_flags_when_parsed_then_all_unset() {
    let cli = parse(&["rail", "clone_source"]);

    match cli.command {
        Commands::CloneSource {
            outdir,
            git_mode,
            dry_run,
            package_file,
        } => {
            assert!(outdir.outdir.is_none());
            assert!(git_mode.git_mode.is_none());
            assert!(!dry_run.dry_run);
            assert!(package_file.package_file.is_none());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn given_install_flags_when_parsed_then_options() {
    let cli = parse(&[
        "rail",
        "install",
        "--from-source",
        "--package-file",
        "pkgs.yml",
        "--outdir",
        "src",
    ]);

    match cli.command {
        Commands::Install {
            outdir,
            dry_run,
            from_source,
            package_file,
        } => {
            assert!(from_source);
            assert!(!dry_run.dry_run);
            assert_eq!(outdir.outdir, Some(PathBuf::from("src")));
            assert_eq!(package_file.package_file, Some(PathBuf::from("pkgs.yml")));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[rstest]
#[case("get_data")]
#[case("get-data")]
fn given_get_data_when_parsed_then_manifest_and_flags(#[case] name: &str) {
    let cli = parse(&["rail", name, "--data-file", "data.yml", "--dry-run"]);

    match cli.command {
        Commands::GetData {
            outdir,
            dry_run,
            data_file,
        } => {
            assert!(outdir.outdir.is_none());
            assert!(dry_run.dry_run);
            assert_eq!(data_file, Some(PathBuf::from("data.yml")));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn given_print_all_when_parsed_then_every_section_selected() {
    let cli = parse(&["rail", "info", "--print-all"]);

    match cli.command {
        Commands::Info { flags } => {
            assert_eq!(InfoSelection::from(flags), InfoSelection::all());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn given_single_print_flag_when_parsed_then_only_that_section() {
    let cli = parse(&["rail", "info", "--print-tree"]);

    match cli.command {
        Commands::Info { flags } => {
            let selection = InfoSelection::from(flags);
            assert!(selection.tree);
            assert!(!selection.packages && !selection.stages);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = parse(&["rail", "config", "init", "--force", "-vv", "-C", "/tmp/p"]);

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.project_dir, Some(PathBuf::from("/tmp/p")));
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommands::Init { force: true }
        }
    ));
}

#[test]
fn given_no_subcommand_when_parsed_then_error() {
    assert!(Cli::try_parse_from(["rail"]).is_err());
}
