/*
 * Knowgraph Engine - Embedded annotation extraction & knowledge-graph assembly
 *
 * Feature-First Architecture:
 * - shared/      : Common models (Span, SymbolKind, Diagnostic), identities
 * - features/    : Vertical slices (scanning → extraction → schema → graph_builder, drift, coverage)
 * - pipeline/    : Parallel per-file scan orchestration
 * - config/      : Versioned YAML engine configuration
 *
 * Determinism:
 * - Identities derive from (file, qualified name, kind) only
 * - Records merge by sentinel rank, never by arrival order
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // SymbolKind::from_str returns Option
#![allow(clippy::type_complexity)] // Sort keys over nested tuples

use once_cell::sync::Lazy;
use std::path::Path;

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Engine configuration
pub mod config;

/// Crate-level errors
pub mod errors;

/// Feature slices
pub mod features;

/// Scan orchestration
pub mod pipeline;

/// Shared models and utilities
pub mod shared;

pub use config::{ConfigError, EngineConfig};
pub use errors::{EngineError, Result};
pub use features::coverage::{CoverageReport, FileCoverage};
pub use features::drift::{diff, GraphDiff, NodeChange};
pub use features::graph_builder::{Edge, EdgeKind, EdgeTarget, EntityId, EntityNode, Graph, GraphStats};
pub use features::schema::{
    AnnotationRecord, Compliance, Context, DataSensitivity, Dependencies, FunnelStage, Link,
    MetaValue, Operational, RevenueImpact, Status,
};
pub use pipeline::{CancellationFlag, Engine, ScanOutcome, SourceFile, SourceSet};
pub use shared::models::{Diagnostic, DiagnosticKind, Diagnostics, Severity, Span, SymbolKind};

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::new);

/// Scan an explicit file list with the default configuration
pub fn scan<I, P>(files: I) -> Result<(Graph, Diagnostics)>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    DEFAULT_ENGINE.scan(files).map(ScanOutcome::into_parts)
}
