//! Tests for InfoService

use std::sync::Arc;

use indexmap::IndexMap;

use rail_hub::application::services::InfoService;
use rail_hub::domain::{InfoSection, InfoSelection, RegistrySnapshot, StageInfo};
use rail_hub::infrastructure::InfraError;
use rail_hub::util::testing::{init_test_setup, StaticRegistry};

fn snapshot() -> RegistrySnapshot {
    let mut packages = IndexMap::new();
    packages.insert("pz-rail-base".to_string(), "1.0.3".to_string());
    packages.insert("pz-rail-bpz".to_string(), "0.2.0".to_string());
    RegistrySnapshot {
        packages,
        namespaces: vec!["rail.creation".into(), "rail.estimation".into()],
        modules: vec![
            "rail.creation.degrader".into(),
            "rail.estimation.algos.bpz".into(),
            "rail.estimation.algos.knn".into(),
        ],
        stages: vec![
            StageInfo {
                name: "KNearNeighEstimator".into(),
                module: "rail.estimation.algos.knn".into(),
            },
            StageInfo {
                name: "BPZliteEstimator".into(),
                module: "rail.estimation.algos.bpz".into(),
            },
        ],
    }
}

#[test]
fn given_all_selected_when_collect_then_five_sections_in_order() {
    init_test_setup();
    let registry = Arc::new(StaticRegistry::new(snapshot()));
    let service = InfoService::new(registry.clone());

    let reports = service.collect(InfoSelection::all()).unwrap();

    let titles: Vec<_> = reports.iter().map(|r| r.title()).collect();
    assert_eq!(
        titles,
        vec![
            "RAIL packages",
            "RAIL namespaces",
            "RAIL modules",
            "RAIL namespace tree",
            "RAIL stages",
        ]
    );
    assert_eq!(registry.discoveries(), 1);
}

#[test]
fn given_nothing_selected_when_collect_then_registry_not_touched() {
    init_test_setup();
    let registry = Arc::new(StaticRegistry::failing());
    let service = InfoService::new(registry.clone());

    let reports = service.collect(InfoSelection::default()).unwrap();

    assert!(reports.is_empty());
    assert_eq!(registry.discoveries(), 0);
}

#[test]
fn given_failing_registry_when_collect_then_error() {
    init_test_setup();
    let service = InfoService::new(Arc::new(StaticRegistry::failing()));
    let selection = InfoSelection {
        packages: true,
        ..InfoSelection::default()
    };

    let result = service.collect(selection);

    assert!(matches!(result, Err(InfraError::Registry { .. })));
}

#[test]
fn given_packages_when_collect_then_name_and_version_per_line() {
    init_test_setup();
    let service = InfoService::new(Arc::new(StaticRegistry::new(snapshot())));
    let selection = InfoSelection {
        packages: true,
        ..InfoSelection::default()
    };

    let reports = service.collect(selection).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].section, InfoSection::Packages);
    assert_eq!(
        reports[0].lines,
        vec!["pz-rail-base 1.0.3", "pz-rail-bpz 0.2.0"]
    );
}

#[test]
fn given_stages_when_collect_then_sorted_by_name() {
    init_test_setup();
    let service = InfoService::new(Arc::new(StaticRegistry::new(snapshot())));
    let selection = InfoSelection {
        stages: true,
        ..InfoSelection::default()
    };

    let reports = service.collect(selection).unwrap();

    let lines = &reports[0].lines;
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("BPZliteEstimator"));
    assert!(lines[0].ends_with("rail.estimation.algos.bpz"));
    assert!(lines[1].starts_with("KNearNeighEstimator"));
}

#[test]
fn given_modules_when_collect_tree_then_single_root() {
    init_test_setup();
    let service = InfoService::new(Arc::new(StaticRegistry::new(snapshot())));
    let selection = InfoSelection {
        tree: true,
        ..InfoSelection::default()
    };

    let reports = service.collect(selection).unwrap();

    let lines = &reports[0].lines;
    assert_eq!(lines[0], "rail");
    assert!(lines.iter().any(|l| l.ends_with("bpz")));
    assert!(lines.iter().any(|l| l.ends_with("degrader")));
}
