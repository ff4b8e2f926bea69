//! Tests for layered settings loading from a project directory

use std::path::PathBuf;

use tempfile::TempDir;

use rail_hub::config::{local_config_path, Settings};
use rail_hub::domain::GitMode;
use rail_hub::util::testing::write_file;

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let temp = TempDir::new().unwrap();

    let settings = Settings::load(Some(temp.path())).unwrap();

    assert_eq!(settings.github_org, "LSSTDESC");
    assert_eq!(settings.git_mode, GitMode::Ssh);
    assert_eq!(settings.package_file, PathBuf::from("rail_packages.yml"));
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        ".rail.toml",
        r#"
github_org = "myorg"
git_mode = "https"

[tools]
pip = "uv pip"
"#,
    );

    let settings = Settings::load(Some(temp.path())).unwrap();

    assert_eq!(settings.github_org, "myorg");
    assert_eq!(settings.git_mode, GitMode::Https);
    assert_eq!(settings.tools.pip, "uv pip");
    // untouched keys keep their defaults
    assert_eq!(settings.tools.jupyter, "jupyter");
    assert_eq!(settings.docs_dir, PathBuf::from("docs"));
}

#[test]
fn given_invalid_git_mode_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), ".rail.toml", "git_mode = \"ftp\"\n");

    let result = Settings::load(Some(temp.path()));

    assert!(result.is_err());
}

#[test]
fn given_project_dir_when_local_config_path_then_dot_file() {
    let path = local_config_path(&PathBuf::from("/work/rail"));
    assert_eq!(path, PathBuf::from("/work/rail/.rail.toml"));
}
