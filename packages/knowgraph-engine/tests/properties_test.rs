//! Whole-scan properties: idempotence, order independence, drift

mod common;

use common::*;
use knowgraph_engine::{diff, EdgeKind, Engine, EngineConfig, SourceFile};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn all_fixture_sources() -> Vec<SourceFile> {
    let mut sources = Vec::new();
    for tree in ["python-fastapi", "polyglot", "migration"] {
        for source in load_sources(tree) {
            sources.push(SourceFile::new(format!("{}/{}", tree, source.path), source.content));
        }
    }
    sources
}

#[test]
fn test_rescan_has_no_drift() {
    let engine = Engine::new();
    let sources = all_fixture_sources();
    let first = engine.scan_sources(&sources).unwrap();
    let second = engine.scan_sources(&sources).unwrap();

    let drift = diff(&first.graph, &second.graph);
    assert!(drift.is_empty(), "unexpected drift: {}", drift.summary());
    assert!(diff(&first.graph, &first.graph).is_empty());
    assert_eq!(first.graph.to_json_pretty().unwrap(), second.graph.to_json_pretty().unwrap());
}

#[test]
fn test_added_function_is_reported() {
    let orders = load_sources("python-fastapi")
        .into_iter()
        .find(|s| s.path == "routers/orders.py")
        .unwrap();
    let start = orders.content.find("def create_order(").unwrap();
    let end = orders.content.find("def get_order(").unwrap();
    let mut without = orders.content.clone();
    without.replace_range(start..end, "");

    let engine = Engine::new();
    let old = engine.scan_sources(&[SourceFile::new("orders.py", without)]).unwrap().graph;
    let new = engine.scan_sources(&[SourceFile::new("orders.py", orders.content)]).unwrap().graph;

    let drift = diff(&old, &new);
    let added: Vec<&str> = drift.added.iter().map(|n| n.fqn.as_str()).collect();
    assert_eq!(added, vec!["orders.create_order"]);
    assert!(drift.removed.is_empty());
    assert!(drift.changed.is_empty());
    assert!(drift
        .edges_added
        .iter()
        .any(|e| e.kind == EdgeKind::Contains && e.target.as_str() == drift.added[0].id));
    assert_eq!(drift.summary(), "+1 ~0 -0");
}

#[test]
fn test_changed_field_is_reported() {
    let before = fixture_annotated_function("ship", "@knowgraph", "owner: logistics");
    let after = fixture_annotated_function("ship", "@knowgraph", "owner: fulfillment");

    let engine = Engine::new();
    let old = engine.scan_sources(&[SourceFile::new("ship.py", before)]).unwrap().graph;
    let new = engine.scan_sources(&[SourceFile::new("ship.py", after)]).unwrap().graph;

    let drift = diff(&old, &new);
    assert_eq!(drift.changed.len(), 1);
    assert_eq!(drift.changed[0].changed_fields, vec!["owner"]);
}

#[test]
fn test_worker_count_does_not_change_result() {
    let sources = all_fixture_sources();
    let default = Engine::new().scan_sources(&sources).unwrap();

    let mut config = EngineConfig::default();
    config.parallel.workers = 1;
    let single = Engine::with_config(config).unwrap().scan_sources(&sources).unwrap();

    assert_eq!(default.graph, single.graph);
    assert_eq!(default.diagnostics, single.diagnostics);
}

#[test]
fn test_structural_edges_only_from_nesting() {
    let source = "\"\"\"\n@knowgraph\ntype: module\ndescription: Shop\n\"\"\"\n\n\nclass Cart:\n    \"\"\"\n    @knowgraph\n    type: class\n    description: Cart\n    \"\"\"\n\n    def add(self):\n        \"\"\"\n        @knowgraph\n        type: method\n        description: Add item\n        \"\"\"\n";
    let outcome = Engine::new().scan_sources(&[SourceFile::new("shop.py", source)]).unwrap();
    assert_no_diagnostics(&outcome);

    let edges = outcome.graph.edges();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|e| e.kind == EdgeKind::Contains));
    assert_eq!(edge_targets(&outcome.graph, "shop", EdgeKind::Contains), vec!["shop.Cart"]);
    assert_eq!(edge_targets(&outcome.graph, "shop.Cart", EdgeKind::Contains), vec!["shop.Cart.add"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_scan_is_independent_of_file_order(
        order in Just((0..all_fixture_sources().len()).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let sources = all_fixture_sources();
        let shuffled: Vec<SourceFile> = order.iter().map(|&i| sources[i].clone()).collect();

        let engine = Engine::new();
        let baseline = engine.scan_sources(&sources).unwrap();
        let permuted = engine.scan_sources(&shuffled).unwrap();

        prop_assert_eq!(baseline.graph, permuted.graph);
        prop_assert_eq!(baseline.diagnostics, permuted.diagnostics);
    }
}
