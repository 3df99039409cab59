// Graph Builder
//
// Records from parallel file workers are buffered per identity in a DashMap
// (entry() locks only that identity's shard). Nothing is merged until
// finish(): each identity's records are then sorted by variant rank and
// source position, so the result never depends on worker completion order.

use dashmap::DashMap;

use crate::features::graph_builder::application::ResolvedRecord;
use crate::features::graph_builder::domain::{
    merge_records, Edge, EdgeKind, EdgeTarget, EntityId, EntityNode, Graph,
};
use crate::features::schema::AnnotationRecord;

#[derive(Debug, Default)]
pub struct GraphBuilder {
    records: DashMap<EntityId, Vec<ResolvedRecord>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer one record under its identity
    pub fn insert(&self, record: ResolvedRecord) {
        self.records.entry(record.id.clone()).or_default().push(record);
    }

    pub fn insert_all(&self, records: impl IntoIterator<Item = ResolvedRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Identities buffered so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Merge every identity and derive edges
    pub fn finish(self) -> Graph {
        let mut buckets: Vec<(EntityId, Vec<ResolvedRecord>)> = self.records.into_iter().collect();
        buckets.sort_by(|a, b| a.0.cmp(&b.0));

        let nodes: Vec<EntityNode> = buckets
            .into_iter()
            .filter_map(|(_, records)| build_node(records))
            .collect();

        let edges = derive_edges(&nodes);
        let graph = Graph::from_parts(nodes, edges);
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph assembled"
        );
        graph
    }
}

// ============================================================
// Node assembly
// ============================================================

fn build_node(mut records: Vec<ResolvedRecord>) -> Option<EntityNode> {
    records.sort_by(|a, b| {
        let key = |r: &ResolvedRecord| (r.provenance.rank, r.provenance.span, r.provenance.token.clone());
        key(a).cmp(&key(b))
    });

    let merged = merge_records(records.iter().map(|r| &r.record))?;
    let first = records.first()?;

    if records.len() > 1 {
        tracing::debug!(
            entity = %first.fqn,
            contributions = records.len(),
            "Merged multi-variant annotations"
        );
    }

    Some(EntityNode {
        id: first.id.clone(),
        file: first.file.clone(),
        module_path: first.module_path.clone(),
        qualified_name: first.qualified_name.clone(),
        fqn: first.fqn.clone(),
        kind: first.kind,
        span: first.span,
        parent: first.parent.clone(),
        variants: records.iter().map(|r| r.provenance.variant.clone()).collect(),
        provenance: records.iter().map(|r| r.provenance.clone()).collect(),
        record: merged,
    })
}

// ============================================================
// Edge derivation
// ============================================================

fn derive_edges(nodes: &[EntityNode]) -> Vec<Edge> {
    let mut edges = Vec::new();

    for node in nodes {
        if let Some(parent) = &node.parent {
            // Parent ids are only set for annotated parents; the lookup
            // guards against a parent record that failed later
            if nodes.binary_search_by(|n| n.id.cmp(parent)).is_ok() {
                edges.push(Edge::new(
                    parent.clone(),
                    EdgeKind::Contains,
                    EdgeTarget::Node(node.id.clone()),
                ));
            }
        }
        semantic_edges(&node.id, &node.record, &mut edges);
    }

    edges
}

fn semantic_edges(source: &str, record: &AnnotationRecord, edges: &mut Vec<Edge>) {
    if let Some(deps) = &record.dependencies {
        let groups = [
            (EdgeKind::DependsOnService, &deps.services),
            (EdgeKind::DependsOnDatabase, &deps.databases),
            (EdgeKind::CallsExternalApi, &deps.external_apis),
        ];
        for (kind, names) in groups {
            for name in names.iter().flatten() {
                edges.push(Edge::new(source, kind, EdgeTarget::External(name.clone())));
            }
        }
    }

    for link in record.links.iter().flatten() {
        let mut edge = Edge::new(source, EdgeKind::LinksToDoc, EdgeTarget::External(link.url.clone()))
            .with_attribute("type", link.link_type.as_str())
            .with_attribute("url", link.url.as_str());
        if let Some(title) = &link.title {
            edge = edge.with_attribute("title", title.as_str());
        }
        edges.push(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::graph_builder::Provenance;
    use crate::features::schema::{Dependencies, Link};
    use crate::shared::models::{Span, SymbolKind};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn resolved(id: &str, variant: &str, rank: u32, line: u32, record: AnnotationRecord) -> ResolvedRecord {
        ResolvedRecord {
            id: id.to_string(),
            file: "sample.py".into(),
            module_path: "sample".into(),
            qualified_name: id.to_string(),
            fqn: format!("sample.{}", id),
            kind: record.kind,
            span: Span::new(line, line + 5),
            parent: None,
            provenance: Provenance {
                variant: variant.into(),
                token: format!("@{}", variant),
                rank,
                file: "sample.py".into(),
                span: Span::new(line, line + 3),
            },
            record,
        }
    }

    fn record(description: &str, owner: Option<&str>) -> AnnotationRecord {
        let mut r = AnnotationRecord::new(SymbolKind::Function, description);
        r.owner = owner.map(str::to_string);
        r
    }

    #[test]
    fn test_merge_is_independent_of_insert_order() {
        let legacy = resolved("f", "codegraph", 0, 20, record("legacy", Some("test-team")));
        let current = resolved("f", "knowgraph", 1, 2, record("current", None));

        let forward = GraphBuilder::new();
        forward.insert(legacy.clone());
        forward.insert(current.clone());

        let backward = GraphBuilder::new();
        backward.insert(current);
        backward.insert(legacy);

        let a = forward.finish();
        let b = backward.finish();
        assert_eq!(a, b);

        let node = a.node("f").unwrap();
        assert_eq!(node.record.description, "current");
        assert_eq!(node.owner(), Some("test-team"));
        assert!(node.is_multi_variant());
        let order: Vec<&str> = node.provenance.iter().map(|p| p.variant.as_str()).collect();
        assert_eq!(order, vec!["codegraph", "knowgraph"]);
    }

    #[test]
    fn test_contains_edges_need_parent_node() {
        let builder = GraphBuilder::new();
        let parent = resolved("cls", "knowgraph", 1, 1, AnnotationRecord::new(SymbolKind::Class, "class"));
        let mut child = resolved("method", "knowgraph", 1, 5, AnnotationRecord::new(SymbolKind::Method, "m"));
        child.parent = Some("cls".into());
        let mut orphan = resolved("orphan", "knowgraph", 1, 9, AnnotationRecord::new(SymbolKind::Method, "o"));
        orphan.parent = Some("missing".into());
        builder.insert_all([parent, child, orphan]);

        let graph = builder.finish();
        let contains: Vec<(&str, &str)> = graph
            .edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::Contains)
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(contains, vec![("cls", "method")]);
    }

    #[test]
    fn test_semantic_edges() {
        let mut rec = record("checkout", None);
        rec.dependencies = Some(Dependencies {
            services: Some(BTreeSet::from(["payment-service".to_string()])),
            databases: Some(BTreeSet::from(["postgres".to_string()])),
            external_apis: Some(BTreeSet::from(["Stripe API".to_string()])),
        });
        rec.links = Some(vec![
            Link {
                link_type: "notion".into(),
                url: "https://notion.so/checkout".into(),
                title: Some("Checkout spec".into()),
            },
            Link {
                link_type: "jira".into(),
                url: "https://jira.example.com/PAY-1".into(),
                title: None,
            },
        ]);

        let builder = GraphBuilder::new();
        builder.insert(resolved("checkout", "knowgraph", 1, 1, rec));
        let graph = builder.finish();

        let kinds: Vec<(EdgeKind, &str)> = graph.edges().iter().map(|e| (e.kind, e.target.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (EdgeKind::DependsOnService, "payment-service"),
                (EdgeKind::DependsOnDatabase, "postgres"),
                (EdgeKind::CallsExternalApi, "Stripe API"),
                (EdgeKind::LinksToDoc, "https://jira.example.com/PAY-1"),
                (EdgeKind::LinksToDoc, "https://notion.so/checkout"),
            ]
        );
        let notion = &graph.edges()[4];
        assert_eq!(notion.attributes.get("type").map(String::as_str), Some("notion"));
        assert_eq!(notion.attributes.get("title").map(String::as_str), Some("Checkout spec"));
        assert!(!graph.edges()[3].attributes.contains_key("title"));
    }

    #[test]
    fn test_reinserting_same_record_does_not_duplicate_edges() {
        let mut rec = record("svc", None);
        rec.dependencies = Some(Dependencies {
            services: Some(BTreeSet::from(["auth".to_string()])),
            ..Default::default()
        });
        let builder = GraphBuilder::new();
        let r = resolved("svc", "knowgraph", 1, 1, rec);
        builder.insert(r.clone());
        builder.insert(r);

        let graph = builder.finish();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 1);
    }
}
