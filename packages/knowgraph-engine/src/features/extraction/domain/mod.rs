//! Extraction domain models

mod sentinel;

pub use sentinel::{Sentinel, SentinelRegistry};

use crate::shared::models::{Span, SymbolId};

/// An unparsed annotation found in one text span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    pub file_path: String,
    /// Schema variant introduced by the sentinel (`knowgraph`, `codegraph`)
    pub variant: String,
    /// Exact marker seen in the source
    pub token: String,
    pub rank: u32,
    /// File line holding the sentinel
    pub sentinel_line: u32,
    /// Lines of the comment/docstring the annotation came from
    pub text_span: Span,
    /// Lines of the structured-text body (the sentinel line when empty)
    pub body_span: Span,
    /// Leader-stripped, dedented structured text
    pub body: String,
    /// Symbol of the owning text span
    pub symbol: Option<SymbolId>,
    /// Definition immediately after the owning text span
    pub adjacent: Option<SymbolId>,
}

impl RawAnnotation {
    /// Span covering sentinel line and body
    pub fn span(&self) -> Span {
        Span::new(self.sentinel_line, self.body_span.end_line.max(self.sentinel_line))
    }

    /// File line of the `n`th (0-based) body line
    pub fn body_line(&self, n: u32) -> u32 {
        (self.body_span.start_line + n).min(self.body_span.end_line)
    }
}
