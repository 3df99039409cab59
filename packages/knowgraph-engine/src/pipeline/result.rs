//! Scan result

use crate::features::coverage::CoverageReport;
use crate::features::graph_builder::Graph;
use crate::shared::models::Diagnostics;

/// Everything one scan produced
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub graph: Graph,
    /// Sorted by (file, span, kind, message)
    pub diagnostics: Diagnostics,
    pub coverage: CoverageReport,
    /// Files that were read and located (unsupported and unreadable files excluded)
    pub files_scanned: usize,
}

impl ScanOutcome {
    pub fn into_parts(self) -> (Graph, Diagnostics) {
        (self.graph, self.diagnostics)
    }
}
