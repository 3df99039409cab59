/// Drift Domain Models
use serde::{Deserialize, Serialize};

use crate::features::graph_builder::{Edge, EntityNode};

/// One node present in both snapshots with differing record fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChange {
    pub old: EntityNode,
    pub new: EntityNode,
    /// Leaf field paths that differ (`owner`, `context.funnel_stage`, `extensions.team_size`)
    pub changed_fields: Vec<String>,
}

impl NodeChange {
    pub fn id(&self) -> &str {
        &self.new.id
    }
}

/// Node and edge differences, each list ordered by identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDiff {
    pub added: Vec<EntityNode>,
    pub removed: Vec<EntityNode>,
    pub changed: Vec<NodeChange>,
    pub edges_added: Vec<Edge>,
    pub edges_removed: Vec<Edge>,
}

impl GraphDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
            && self.edges_added.is_empty()
            && self.edges_removed.is_empty()
    }

    /// `+added ~changed -removed`
    pub fn summary(&self) -> String {
        format!("+{} ~{} -{}", self.added.len(), self.changed.len(), self.removed.len())
    }
}
