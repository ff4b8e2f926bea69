//! Plugin registry model: what `info` can report on

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use termtree::Tree;

/// Sections printed by `info`, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoSection {
    Packages,
    Namespaces,
    Modules,
    Tree,
    Stages,
}

impl InfoSection {
    pub const ALL: [InfoSection; 5] = [
        InfoSection::Packages,
        InfoSection::Namespaces,
        InfoSection::Modules,
        InfoSection::Tree,
        InfoSection::Stages,
    ];

    pub fn title(self) -> &'static str {
        match self {
            InfoSection::Packages => "RAIL packages",
            InfoSection::Namespaces => "RAIL namespaces",
            InfoSection::Modules => "RAIL modules",
            InfoSection::Tree => "RAIL namespace tree",
            InfoSection::Stages => "RAIL stages",
        }
    }
}

/// Which `info` sections to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoSelection {
    pub packages: bool,
    pub namespaces: bool,
    pub modules: bool,
    pub tree: bool,
    pub stages: bool,
}

impl InfoSelection {
    pub fn all() -> Self {
        Self {
            packages: true,
            namespaces: true,
            modules: true,
            tree: true,
            stages: true,
        }
    }

    /// `all` forces every section on.
    pub fn or_all(self, all: bool) -> Self {
        if all {
            Self::all()
        } else {
            self
        }
    }

    pub fn contains(&self, section: InfoSection) -> bool {
        match section {
            InfoSection::Packages => self.packages,
            InfoSection::Namespaces => self.namespaces,
            InfoSection::Modules => self.modules,
            InfoSection::Tree => self.tree,
            InfoSection::Stages => self.stages,
        }
    }

    /// Selected sections in print order.
    pub fn sections(&self) -> Vec<InfoSection> {
        InfoSection::ALL
            .into_iter()
            .filter(|s| self.contains(*s))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// A registered processing stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    pub name: String,
    /// Dotted path of the module defining the stage
    pub module: String,
}

/// Everything the registry knows after discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySnapshot {
    /// Distribution name -> installed version
    pub packages: IndexMap<String, String>,
    /// Top-level namespace packages, e.g. `rail.estimation`
    pub namespaces: Vec<String>,
    /// Every importable module, dotted
    pub modules: Vec<String>,
    pub stages: Vec<StageInfo>,
}

impl RegistrySnapshot {
    /// Nest dotted module names into a tree rooted at their common root.
    pub fn namespace_tree(&self) -> Vec<Tree<String>> {
        namespace_tree(self.modules.iter().map(String::as_str))
    }
}

#[derive(Default)]
struct Node(BTreeMap<String, Node>);

/// Build one tree per distinct root segment.
pub fn namespace_tree<'a>(modules: impl IntoIterator<Item = &'a str>) -> Vec<Tree<String>> {
    let mut root = Node::default();
    for module in modules {
        let mut node = &mut root;
        for segment in module.split('.').filter(|s| !s.is_empty()) {
            node = node.0.entry(segment.to_string()).or_default();
        }
    }
    root.0
        .into_iter()
        .map(|(name, node)| to_tree(name, node))
        .collect()
}

fn to_tree(name: String, node: Node) -> Tree<String> {
    let leaves: Vec<_> = node
        .0
        .into_iter()
        .map(|(child, grandchildren)| to_tree(child, grandchildren))
        .collect();
    Tree::new(name).with_leaves(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_all_flag_when_or_all_then_every_section_selected() {
        let selection = InfoSelection {
            stages: true,
            ..Default::default()
        }
        .or_all(true);
        assert_eq!(selection.sections(), InfoSection::ALL.to_vec());
    }

    #[test]
    fn given_partial_selection_when_sections_then_fixed_order() {
        let selection = InfoSelection {
            stages: true,
            packages: true,
            ..Default::default()
        };
        assert_eq!(
            selection.sections(),
            vec![InfoSection::Packages, InfoSection::Stages]
        );
        assert!(InfoSelection::default().is_empty());
    }

    #[test]
    fn given_dotted_modules_when_namespace_tree_then_nested() {
        let trees = namespace_tree([
            "rail.estimation.algos.knnpz",
            "rail.estimation.estimator",
            "rail.core.stage",
        ]);

        assert_eq!(trees.len(), 1);
        let rendered = trees[0].to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "rail");
        assert!(rendered.contains("core"));
        assert!(rendered.contains("knnpz"));
        // BTreeMap ordering: core before estimation
        let core = rendered.find("core").unwrap();
        let estimation = rendered.find("estimation").unwrap();
        assert!(core < estimation);
    }
}
