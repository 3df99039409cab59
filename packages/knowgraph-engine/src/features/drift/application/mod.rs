//! Snapshot diffing

use std::collections::{BTreeMap, BTreeSet};

use crate::features::drift::domain::{GraphDiff, NodeChange};
use crate::features::graph_builder::{Edge, EdgeKind, EdgeTarget, EntityNode, Graph};

/// Compare two graphs built from the same tree at different times
pub fn diff(old: &Graph, new: &Graph) -> GraphDiff {
    let mut out = GraphDiff::default();

    for node in new.nodes() {
        match old.node(&node.id) {
            None => out.added.push(node.clone()),
            Some(previous) => {
                let changed_fields = changed_fields(previous, node);
                if !changed_fields.is_empty() {
                    out.changed.push(NodeChange {
                        old: previous.clone(),
                        new: node.clone(),
                        changed_fields,
                    });
                }
            }
        }
    }
    out.removed = old
        .nodes()
        .filter(|n| !new.contains_node(&n.id))
        .cloned()
        .collect();

    let old_edges = edge_index(old);
    let new_edges = edge_index(new);
    out.edges_added = new_edges
        .iter()
        .filter(|(key, _)| !old_edges.contains_key(*key))
        .map(|(_, e)| (*e).clone())
        .collect();
    out.edges_removed = old_edges
        .iter()
        .filter(|(key, _)| !new_edges.contains_key(*key))
        .map(|(_, e)| (*e).clone())
        .collect();

    tracing::debug!(summary = %out.summary(), "Graph diff computed");
    out
}

/// Leaf paths whose values differ, in path order
fn changed_fields(old: &EntityNode, new: &EntityNode) -> Vec<String> {
    let before = old.record.fields();
    let after = new.record.fields();
    let paths: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    paths
        .into_iter()
        .filter(|path| before.get(*path) != after.get(*path))
        .map(|path| path.to_string())
        .collect()
}

type EdgeKey<'a> = (&'a str, EdgeKind, &'a EdgeTarget);

fn edge_index(graph: &Graph) -> BTreeMap<EdgeKey<'_>, &Edge> {
    graph.edges().iter().map(|e| (e.key(), e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::graph_builder::Provenance;
    use crate::features::schema::{AnnotationRecord, Context, FunnelStage};
    use crate::shared::models::{Span, SymbolKind};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn node(id: &str, line: u32) -> EntityNode {
        EntityNode {
            id: id.to_string(),
            file: "orders.py".into(),
            module_path: "orders".into(),
            qualified_name: id.to_string(),
            fqn: format!("orders.{}", id),
            kind: SymbolKind::Function,
            span: Span::new(line, line + 4),
            record: AnnotationRecord::new(SymbolKind::Function, format!("{} handler", id)),
            variants: BTreeSet::from(["knowgraph".to_string()]),
            provenance: vec![Provenance {
                variant: "knowgraph".into(),
                token: "@knowgraph".into(),
                rank: 1,
                file: "orders.py".into(),
                span: Span::new(line + 1, line + 3),
            }],
            parent: None,
        }
    }

    fn service_edge(source: &str, service: &str) -> Edge {
        Edge::new(source, EdgeKind::DependsOnService, EdgeTarget::External(service.into()))
    }

    #[test]
    fn test_identical_graphs_have_no_drift() {
        let graph = Graph::from_parts(vec![node("list_orders", 1)], vec![service_edge("list_orders", "db")]);
        let result = diff(&graph, &graph);
        assert!(result.is_empty());
        assert_eq!(result.summary(), "+0 ~0 -0");
    }

    #[test]
    fn test_added_and_removed() {
        let old = Graph::from_parts(vec![node("list_orders", 1), node("legacy_export", 30)], vec![]);
        let new = Graph::from_parts(vec![node("list_orders", 1), node("create_order", 10)], vec![]);

        let result = diff(&old, &new);
        let added: Vec<&str> = result.added.iter().map(|n| n.fqn.as_str()).collect();
        let removed: Vec<&str> = result.removed.iter().map(|n| n.fqn.as_str()).collect();
        assert_eq!(added, vec!["orders.create_order"]);
        assert_eq!(removed, vec!["orders.legacy_export"]);
        assert!(result.changed.is_empty());
        assert_eq!(result.summary(), "+1 ~0 -1");
    }

    #[test]
    fn test_changed_lists_leaf_paths() {
        let before = node("create_order", 10);
        let mut after = node("create_order", 14);
        after.record.owner = Some("orders-team".into());
        after.record.context = Some(Context {
            funnel_stage: Some(FunnelStage::Revenue),
            ..Default::default()
        });

        let result = diff(
            &Graph::from_parts(vec![before], vec![]),
            &Graph::from_parts(vec![after], vec![]),
        );
        assert_eq!(result.changed.len(), 1);
        assert_eq!(result.changed[0].id(), "create_order");
        assert_eq!(result.changed[0].changed_fields, vec!["context.funnel_stage", "owner"]);
    }

    #[test]
    fn test_line_shift_alone_is_not_drift() {
        let result = diff(
            &Graph::from_parts(vec![node("create_order", 10)], vec![]),
            &Graph::from_parts(vec![node("create_order", 40)], vec![]),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_edge_drift() {
        let old = Graph::from_parts(vec![node("pay", 1)], vec![service_edge("pay", "stripe")]);
        let new = Graph::from_parts(vec![node("pay", 1)], vec![service_edge("pay", "adyen")]);

        let result = diff(&old, &new);
        assert_eq!(result.edges_added, vec![service_edge("pay", "adyen")]);
        assert_eq!(result.edges_removed, vec![service_edge("pay", "stripe")]);
        assert!(!result.is_empty());
    }
}
