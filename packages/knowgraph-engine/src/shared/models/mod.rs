//! Shared models

mod diagnostic;
mod span;
mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use span::Span;
pub use symbol::{EnclosingSymbol, SymbolId, SymbolKind};
