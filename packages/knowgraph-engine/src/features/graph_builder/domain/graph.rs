// Entity graph
//
// Nodes keyed by identity (BTreeMap, so iteration and serialization order are
// stable), edges kept sorted and deduped by (source, kind, target).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Edge, EdgeKind, EdgeTarget, EntityId, EntityNode};
use crate::errors::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    nodes: BTreeMap<EntityId, EntityNode>,
    edges: Vec<Edge>,
}

/// Node/edge counts for logging and reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub nodes_by_kind: BTreeMap<String, usize>,
    pub edges_by_kind: BTreeMap<String, usize>,
    pub multi_variant_nodes: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parts; edges are sorted and deduped by (source, kind, target)
    pub fn from_parts(nodes: impl IntoIterator<Item = EntityNode>, edges: Vec<Edge>) -> Self {
        let nodes = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        Self {
            nodes,
            edges: dedupe_edges(edges),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &EntityNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&EntityNode> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up by `module.qualified` (module-level entities by module path alone)
    pub fn node_by_fqn(&self, fqn: &str) -> Option<&EntityNode> {
        self.nodes.values().find(|n| n.fqn == fqn)
    }

    pub fn nodes_by_owner<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a EntityNode> {
        self.nodes.values().filter(move |n| n.owner() == Some(owner))
    }

    pub fn nodes_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a EntityNode> {
        self.nodes
            .values()
            .filter(move |n| n.record.tags.as_ref().is_some_and(|t| t.contains(tag)))
    }

    /// Nodes with a semantic edge to the given external identifier
    pub fn dependents_of(&self, external: &str) -> Vec<&EntityNode> {
        let mut ids: Vec<&str> = self
            .edges
            .iter()
            .filter(|e| !e.kind.is_structural())
            .filter(|e| matches!(&e.target, EdgeTarget::External(name) if name == external))
            .map(|e| e.source.as_str())
            .collect();
        ids.dedup();
        ids.into_iter().filter_map(|id| self.nodes.get(id)).collect()
    }

    /// Direct children via `contains` edges
    pub fn children_of(&self, id: &str) -> Vec<&EntityNode> {
        self.edges_from(id)
            .filter(|e| e.kind == EdgeKind::Contains)
            .filter_map(|e| match &e.target {
                EdgeTarget::Node(child) => self.nodes.get(child),
                EdgeTarget::External(_) => None,
            })
            .collect()
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
        // Sorted by source first
        let start = self.edges.partition_point(|e| e.source.as_str() < id);
        self.edges[start..].iter().take_while(move |e| e.source == id)
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            ..Default::default()
        };
        for node in self.nodes.values() {
            *stats.nodes_by_kind.entry(node.kind.as_str().to_string()).or_default() += 1;
            if node.is_multi_variant() {
                stats.multi_variant_nodes += 1;
            }
        }
        for edge in &self.edges {
            *stats.edges_by_kind.entry(edge.kind.as_str().to_string()).or_default() += 1;
        }
        stats
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot; edges are re-normalized so hand-edited snapshots still diff cleanly
    pub fn from_json(json: &str) -> Result<Self> {
        let graph: Graph = serde_json::from_str(json)?;
        Ok(Self::from_parts(graph.nodes.into_values(), graph.edges))
    }
}

fn dedupe_edges(mut edges: Vec<Edge>) -> Vec<Edge> {
    edges.sort();
    // First edge per key wins; attributes of later copies are dropped
    edges.dedup_by(|later, first| later.key() == first.key());
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::graph_builder::Provenance;
    use crate::features::schema::{AnnotationRecord, Dependencies};
    use crate::shared::models::{Span, SymbolKind};
    use std::collections::BTreeSet;

    fn node(id: &str, fqn: &str, kind: SymbolKind) -> EntityNode {
        let (module_path, qualified_name) = fqn.split_once('.').unwrap_or((fqn, ""));
        EntityNode {
            id: id.to_string(),
            file: format!("{}.py", module_path),
            module_path: module_path.to_string(),
            qualified_name: qualified_name.to_string(),
            fqn: fqn.to_string(),
            kind,
            span: Span::new(1, 10),
            record: AnnotationRecord::new(kind, format!("{} node", fqn)),
            variants: BTreeSet::from(["knowgraph".to_string()]),
            provenance: vec![Provenance {
                variant: "knowgraph".into(),
                token: "@knowgraph".into(),
                rank: 1,
                file: format!("{}.py", module_path),
                span: Span::new(1, 3),
            }],
            parent: None,
        }
    }

    fn sample() -> Graph {
        let mut module = node("m", "orders", SymbolKind::Module);
        module.record.owner = Some("orders-team".into());
        let mut create = node("c", "orders.create_order", SymbolKind::Function);
        create.record.owner = Some("orders-team".into());
        create.record.tags = Some(BTreeSet::from(["orders".to_string(), "payment".to_string()]));
        create.record.dependencies = Some(Dependencies {
            services: Some(BTreeSet::from(["payment-service".to_string()])),
            ..Default::default()
        });
        create.parent = Some("m".into());
        let list = node("l", "orders.list_orders", SymbolKind::Function);

        let edges = vec![
            Edge::new("m", EdgeKind::Contains, EdgeTarget::Node("l".into())),
            Edge::new("c", EdgeKind::DependsOnService, EdgeTarget::External("payment-service".into())),
            Edge::new("m", EdgeKind::Contains, EdgeTarget::Node("c".into())),
            Edge::new("m", EdgeKind::Contains, EdgeTarget::Node("c".into())),
        ];
        Graph::from_parts(vec![create, module, list], edges)
    }

    #[test]
    fn test_edges_sorted_and_deduped() {
        let graph = sample();
        assert_eq!(graph.edge_count(), 3);
        let keys: Vec<_> = graph.edges().iter().map(|e| (e.source.as_str(), e.target.as_str())).collect();
        assert_eq!(keys, vec![("c", "payment-service"), ("m", "c"), ("m", "l")]);
    }

    #[test]
    fn test_queries() {
        let graph = sample();
        assert_eq!(graph.node_by_fqn("orders.create_order").map(|n| n.id.as_str()), Some("c"));
        assert_eq!(graph.node_by_fqn("orders").map(|n| n.kind), Some(SymbolKind::Module));
        assert_eq!(graph.nodes_by_owner("orders-team").count(), 2);
        assert_eq!(graph.nodes_with_tag("payment").count(), 1);

        let dependents: Vec<_> = graph.dependents_of("payment-service").iter().map(|n| n.id.clone()).collect();
        assert_eq!(dependents, vec!["c"]);
        assert!(graph.dependents_of("unknown").is_empty());

        let children: Vec<_> = graph.children_of("m").iter().map(|n| n.id.clone()).collect();
        assert_eq!(children, vec!["c", "l"]);
        assert!(graph.children_of("c").is_empty());
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.nodes_by_kind.get("function"), Some(&2));
        assert_eq!(stats.edges_by_kind.get("contains"), Some(&2));
        assert_eq!(stats.multi_variant_nodes, 0);
    }

    #[test]
    fn test_json_snapshot_roundtrip_is_stable() {
        let graph = sample();
        let json = graph.to_json_pretty().unwrap();
        let restored = Graph::from_json(&json).unwrap();
        assert_eq!(restored, graph);
        assert_eq!(restored.to_json_pretty().unwrap(), json);
    }

    #[test]
    fn test_invalid_snapshot_is_error() {
        assert!(Graph::from_json("{not json").is_err());
    }
}
