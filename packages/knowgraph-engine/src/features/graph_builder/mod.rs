// Entity Resolver / Graph Builder
//
// Maps validated annotation records onto entity nodes keyed by a
// content-derived identity, merges schema variants field by field, and
// derives containment and declared-reference edges.
//
// ## Architecture
// - Domain: EntityNode, Edge, Graph (+ queries), field-level merge
// - Application: EntityResolver (per-file symbol targeting, identity checks)
// - Infrastructure: GraphBuilder (concurrent accumulation, final merge)
//
// ## Determinism
// Records are buffered per identity and merged once, sorted by
// (variant rank, sentinel line). Arrival order never matters.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{EntityResolver, ResolvedRecord};
pub use domain::{
    merge_records, Edge, EdgeKind, EdgeTarget, EntityId, EntityNode, Graph, GraphStats,
    Provenance,
};
pub use infrastructure::GraphBuilder;
