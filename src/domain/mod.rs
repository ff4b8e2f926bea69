//! Domain layer: entities and pure logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod data;
pub mod descriptor;
pub mod entities;
pub mod error;
pub mod registry;

pub use data::{DataFile, DataManifest};
pub use descriptor::{validate_package_name, PackageDescriptor};
pub use entities::*;
pub use error::DomainError;
pub use registry::{namespace_tree, InfoSection, InfoSelection, RegistrySnapshot, StageInfo};
