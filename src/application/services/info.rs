//! Environment info service: reports what the plugin registry discovered

use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::domain::{InfoSection, InfoSelection, RegistrySnapshot};
use crate::infrastructure::traits::Registry;
use crate::infrastructure::InfraResult;

/// One printed section: banner title plus body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoReport {
    pub section: InfoSection,
    pub lines: Vec<String>,
}

impl InfoReport {
    pub fn title(&self) -> &'static str {
        self.section.title()
    }
}

pub struct InfoService {
    registry: Arc<dyn Registry>,
}

impl InfoService {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }

    /// Discover the registry and build the selected sections, in print order.
    ///
    /// Nothing is discovered when no section is selected.
    pub fn collect(&self, selection: InfoSelection) -> InfraResult<Vec<InfoReport>> {
        let sections = selection.sections();
        if sections.is_empty() {
            debug!("collect: no section selected");
            return Ok(Vec::new());
        }

        let snapshot = self.registry.discover()?;
        Ok(sections
            .into_iter()
            .map(|section| InfoReport {
                section,
                lines: section_lines(section, &snapshot),
            })
            .collect())
    }
}

fn section_lines(section: InfoSection, snapshot: &RegistrySnapshot) -> Vec<String> {
    match section {
        InfoSection::Packages => snapshot
            .packages
            .iter()
            .map(|(name, version)| format!("{name} {version}"))
            .collect(),
        InfoSection::Namespaces => snapshot.namespaces.clone(),
        InfoSection::Modules => snapshot.modules.clone(),
        InfoSection::Tree => snapshot
            .namespace_tree()
            .iter()
            .flat_map(|tree| {
                tree.to_string()
                    .lines()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect(),
        InfoSection::Stages => {
            let width = snapshot
                .stages
                .iter()
                .map(|s| s.name.len())
                .max()
                .unwrap_or(0);
            snapshot
                .stages
                .iter()
                .sorted_by(|a, b| a.name.cmp(&b.name))
                .map(|s| format!("{:<width$}  {}", s.name, s.module))
                .collect()
        }
    }
}
