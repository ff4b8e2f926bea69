//! Data manifest: files fetched into the source tree on demand
//!
//! ```yaml
//! - local_path: src/rail/examples_data/goldenspike_data/data/base_catalog.pq
//!   remote_path: https://portal.nersc.gov/cfs/lsst/PZ/base_catalog.pq
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::domain::{DomainError, ShellCommand};

/// A data file and where to download it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataFile {
    pub local_path: PathBuf,
    pub remote_path: String,
}

impl DataFile {
    /// `curl -o <local> <remote> --create-dirs`
    pub fn fetch_command(&self, curl: &str, local: &Path) -> ShellCommand {
        ShellCommand::tool(curl)
            .arg("-o")
            .arg(local.display().to_string())
            .arg(&self.remote_path)
            .arg("--create-dirs")
    }
}

/// Data files in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataManifest {
    files: Vec<DataFile>,
}

impl DataManifest {
    /// Parse manifest content: a YAML sequence of `local_path`/`remote_path` entries.
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        let invalid = |e: serde_yaml::Error| DomainError::InvalidManifest {
            message: e.to_string(),
        };
        let files: Vec<DataFile> = match serde_yaml::from_str(content).map_err(invalid)? {
            Value::Null => Vec::new(),
            root => serde_yaml::from_value(root).map_err(invalid)?,
        };

        for file in &files {
            if file.local_path.as_os_str().is_empty() {
                return Err(DomainError::InvalidManifest {
                    message: format!("empty local_path for {}", file.remote_path),
                });
            }
            if file.remote_path.trim().is_empty() {
                return Err(DomainError::InvalidManifest {
                    message: format!("empty remote_path for {}", file.local_path.display()),
                });
            }
        }
        Ok(Self { files })
    }

    pub fn files(&self) -> &[DataFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_entries_when_parse_then_keeps_order() {
        let manifest = DataManifest::parse(
            "- local_path: data/b.pq\n  remote_path: https://example.org/b.pq\n\
             - local_path: data/a.pq\n  remote_path: https://example.org/a.pq\n",
        )
        .unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.files()[0].local_path, PathBuf::from("data/b.pq"));
        assert_eq!(manifest.files()[1].remote_path, "https://example.org/a.pq");
    }

    #[test]
    fn given_empty_content_when_parse_then_empty_manifest() {
        assert!(DataManifest::parse("").unwrap().is_empty());
    }

    #[test]
    fn given_missing_remote_when_parse_then_error() {
        let err = DataManifest::parse("- local_path: data/a.pq\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidManifest { .. }));
    }

    #[test]
    fn given_blank_remote_when_parse_then_error() {
        let err = DataManifest::parse("- local_path: data/a.pq\n  remote_path: ' '\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidManifest { .. }));
    }

    #[test]
    fn given_data_file_when_fetch_command_then_curl_with_create_dirs() {
        let file = DataFile {
            local_path: PathBuf::from("data/base_catalog.pq"),
            remote_path: "https://portal.nersc.gov/cfs/lsst/PZ/base_catalog.pq".into(),
        };

        let cmd = file.fetch_command("curl", &file.local_path);

        assert_eq!(
            cmd.to_string(),
            "curl -o data/base_catalog.pq https://portal.nersc.gov/cfs/lsst/PZ/base_catalog.pq --create-dirs"
        );
    }
}
