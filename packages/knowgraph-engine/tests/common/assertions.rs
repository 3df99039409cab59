//! Custom assertions for scan results

use knowgraph_engine::{DiagnosticKind, EdgeKind, EntityNode, Graph, ScanOutcome};

/// Assert that a scan produced no diagnostics at all
pub fn assert_no_diagnostics(outcome: &ScanOutcome) {
    assert!(
        outcome.diagnostics.is_empty(),
        "Expected no diagnostics, got: {:#?}",
        outcome.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    );
}

/// Diagnostic kinds in report order
pub fn diagnostic_kinds(outcome: &ScanOutcome) -> Vec<DiagnosticKind> {
    outcome.diagnostics.iter().map(|d| d.kind).collect()
}

/// Node by FQN, failing with the list of known FQNs
pub fn node<'a>(graph: &'a Graph, fqn: &str) -> &'a EntityNode {
    graph.node_by_fqn(fqn).unwrap_or_else(|| {
        panic!(
            "No node '{fqn}'. Known: {:?}",
            graph.nodes().map(|n| n.fqn.as_str()).collect::<Vec<_>>()
        )
    })
}

/// Targets of edges of `kind` leaving the node `fqn` (node targets rendered as FQNs)
pub fn edge_targets(graph: &Graph, fqn: &str, kind: EdgeKind) -> Vec<String> {
    let source = node(graph, fqn);
    graph
        .edges_from(&source.id)
        .filter(|e| e.kind == kind)
        .map(|e| match graph.node(e.target.as_str()) {
            Some(target) if kind == EdgeKind::Contains => target.fqn.clone(),
            _ => e.target.as_str().to_string(),
        })
        .collect()
}

/// Sorted FQNs of all nodes
pub fn fqns(graph: &Graph) -> Vec<String> {
    let mut all: Vec<String> = graph.nodes().map(|n| n.fqn.clone()).collect();
    all.sort();
    all
}
