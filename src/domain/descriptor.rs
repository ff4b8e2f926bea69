//! Package descriptor: ordered mapping of package name to install specifier
//!
//! Loaded from a YAML file holding a single top-level mapping:
//!
//! ```yaml
//! rail_base: pz-rail-base
//! rail_bpz: pz-rail-bpz>=1.0
//! ```

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::domain::DomainError;

/// Package name -> install specifier, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    entries: IndexMap<String, String>,
}

impl PackageDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a package entry.
    ///
    /// The name is used verbatim as a directory name, so it must be a
    /// single path segment.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        specifier: impl Into<String>,
    ) -> Result<(), DomainError> {
        let name = name.into();
        validate_package_name(&name)?;
        self.entries.insert(name, specifier.into());
        Ok(())
    }

    /// Parse descriptor content.
    ///
    /// Scalar names and specifiers (numbers, booleans) are kept as their
    /// string form, a null specifier falls back to the package name.
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        let root: Value =
            serde_yaml::from_str(content).map_err(|e| DomainError::InvalidDescriptor {
                message: e.to_string(),
            })?;

        let mapping = match root {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(DomainError::InvalidDescriptor {
                    message: format!("expected a top-level mapping, found {}", kind(&other)),
                })
            }
        };

        let mut descriptor = Self::new();
        for (key, value) in mapping {
            let name = scalar_string(&key).ok_or_else(|| DomainError::InvalidDescriptor {
                message: format!("package names must be scalars, found {}", kind(&key)),
            })?;
            let specifier = match value {
                Value::Null => name.clone(),
                other => match scalar_string(&other) {
                    Some(s) => s,
                    None => return Err(DomainError::InvalidSpecifier { name }),
                },
            };
            descriptor.insert(name, specifier)?;
        }
        Ok(descriptor)
    }

    /// Serialize back to YAML; parsing the result yields an equal descriptor.
    pub fn to_yaml(&self) -> Result<String, DomainError> {
        serde_yaml::to_string(&self.entries).map_err(|e| DomainError::InvalidDescriptor {
            message: e.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check that a package name is usable as a single directory name.
pub fn validate_package_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative directory reference")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidPackageName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mapping_when_parse_then_keeps_file_order() {
        let descriptor = PackageDescriptor::parse(
            "rail_pipelines: pz-rail-pipelines\nrail_base: pz-rail-base\nrail_astro_tools: pz-rail-astro-tools\n",
        )
        .unwrap();

        let names: Vec<_> = descriptor.names().collect();
        assert_eq!(names, vec!["rail_pipelines", "rail_base", "rail_astro_tools"]);
        assert_eq!(descriptor.get("rail_base"), Some("pz-rail-base"));
    }

    #[test]
    fn given_scalar_specifiers_when_parse_then_stringifies() {
        let descriptor = PackageDescriptor::parse("a: 1.5\nb: true\nc:\n").unwrap();

        assert_eq!(descriptor.get("a"), Some("1.5"));
        assert_eq!(descriptor.get("b"), Some("true"));
        assert_eq!(descriptor.get("c"), Some("c"));
    }

    #[test]
    fn given_numeric_name_when_parse_then_used_as_string() {
        let descriptor = PackageDescriptor::parse("123: foo\n456:\n").unwrap();

        assert_eq!(descriptor.get("123"), Some("foo"));
        assert_eq!(descriptor.get("456"), Some("456"));
        let yaml = descriptor.to_yaml().unwrap();
        assert_eq!(PackageDescriptor::parse(&yaml).unwrap(), descriptor);
    }

    #[test]
    fn given_sequence_name_when_parse_then_error() {
        let err = PackageDescriptor::parse("? [a, b]\n: c\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidDescriptor { .. }));
    }

    #[test]
    fn given_empty_content_when_parse_then_empty_descriptor() {
        let descriptor = PackageDescriptor::parse("").unwrap();
        assert!(descriptor.is_empty());
    }

    #[test]
    fn given_sequence_root_when_parse_then_error() {
        let err = PackageDescriptor::parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidDescriptor { .. }));
    }

    #[test]
    fn given_nested_specifier_when_parse_then_error() {
        let err = PackageDescriptor::parse("a:\n  b: c\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidSpecifier { ref name } if name == "a"));
    }

    #[test]
    fn given_path_like_name_when_parse_then_rejected() {
        let err = PackageDescriptor::parse("../evil: pz-rail\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPackageName { .. }));
    }

    #[test]
    fn test_validate_package_name() {
        assert!(validate_package_name("rail_base").is_ok());
        assert!(validate_package_name("").is_err());
        assert!(validate_package_name(".").is_err());
        assert!(validate_package_name("..").is_err());
        assert!(validate_package_name("a/b").is_err());
        assert!(validate_package_name("a\\b").is_err());
    }

    #[test]
    fn given_descriptor_when_to_yaml_and_parse_then_identical() {
        let mut descriptor = PackageDescriptor::new();
        descriptor.insert("rail_base", "pz-rail-base").unwrap();
        descriptor.insert("rail_flow", "pz-rail-flow==1.0").unwrap();
        descriptor.insert("numeric", "1.0").unwrap();

        let yaml = descriptor.to_yaml().unwrap();
        let parsed = PackageDescriptor::parse(&yaml).unwrap();

        assert_eq!(parsed, descriptor);
    }
}
