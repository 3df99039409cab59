// Graph Builder Domain Models
//
// Pure models: nodes, edges, the graph itself and the merge policy.

mod graph;
mod merge;

pub use graph::{Graph, GraphStats};
pub use merge::merge_records;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::features::schema::AnnotationRecord;
use crate::shared::models::{Span, SymbolKind};

/// Content-derived entity identity (32 hex chars)
pub type EntityId = String;

// ============================================================
// Edges
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Contains,
    DependsOnService,
    DependsOnDatabase,
    CallsExternalApi,
    LinksToDoc,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 5] = [
        EdgeKind::Contains,
        EdgeKind::DependsOnService,
        EdgeKind::DependsOnDatabase,
        EdgeKind::CallsExternalApi,
        EdgeKind::LinksToDoc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Contains => "contains",
            EdgeKind::DependsOnService => "depends_on_service",
            EdgeKind::DependsOnDatabase => "depends_on_database",
            EdgeKind::CallsExternalApi => "calls_external_api",
            EdgeKind::LinksToDoc => "links_to_doc",
        }
    }

    /// Structural edges point at nodes; all others at external identifiers
    pub fn is_structural(&self) -> bool {
        matches!(self, EdgeKind::Contains)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an edge points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTarget {
    /// Another entity node
    Node(EntityId),
    /// Opaque external resource (service, database, API, document URL)
    External(String),
}

impl EdgeTarget {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeTarget::Node(id) => id,
            EdgeTarget::External(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: EntityId,
    pub kind: EdgeKind,
    pub target: EdgeTarget,
    /// Link type/url/title for `links_to_doc`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Edge {
    pub fn new(source: impl Into<EntityId>, kind: EdgeKind, target: EdgeTarget) -> Self {
        Self {
            source: source.into(),
            kind,
            target,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Dedupe key
    pub fn key(&self) -> (&str, EdgeKind, &EdgeTarget) {
        (&self.source, self.kind, &self.target)
    }
}

// ============================================================
// Nodes
// ============================================================

/// Where one contributing annotation came from
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Provenance {
    pub variant: String,
    pub token: String,
    pub rank: u32,
    pub file: String,
    /// Sentinel line through end of body
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNode {
    pub id: EntityId,
    pub file: String,
    pub module_path: String,
    /// Dotted path below the module; empty for module-level entities
    pub qualified_name: String,
    /// `module_path.qualified_name`
    pub fqn: String,
    /// Structural kind of the annotated symbol
    pub kind: SymbolKind,
    /// Source lines of the annotated symbol
    pub span: Span,
    /// Merged record
    pub record: AnnotationRecord,
    pub variants: BTreeSet<String>,
    /// One entry per contributing annotation, ordered by merge precedence
    pub provenance: Vec<Provenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
}

impl EntityNode {
    /// Carries more than one sentinel variant (migration in progress)
    pub fn is_multi_variant(&self) -> bool {
        self.variants.len() > 1
    }

    pub fn owner(&self) -> Option<&str> {
        self.record.owner.as_deref()
    }
}
