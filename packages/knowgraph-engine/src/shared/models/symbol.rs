//! Enclosing symbols
//!
//! Symbols are derived from syntactic structure during a single scan pass
//! and form a containment tree per file, rooted at the module symbol.

use serde::{Deserialize, Serialize};

use super::Span;

/// Kind of code entity that may carry an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Class,
    Function,
    Method,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 4] = [
        SymbolKind::Module,
        SymbolKind::Class,
        SymbolKind::Function,
        SymbolKind::Method,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "module" => Some(SymbolKind::Module),
            "class" => Some(SymbolKind::Class),
            "function" => Some(SymbolKind::Function),
            "method" => Some(SymbolKind::Method),
            _ => None,
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of a symbol inside its file's symbol table
pub type SymbolId = usize;

/// A code symbol that encloses (or is immediately preceded by) a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingSymbol {
    pub id: SymbolId,
    /// Bare name (`method_one`); for the module symbol, the module path
    pub name: String,
    /// Dotted path below the module root (`SampleClass.method_one`).
    /// Empty for the module symbol itself.
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub span: Span,
    pub parent: Option<SymbolId>,
}

impl EnclosingSymbol {
    pub fn is_module(&self) -> bool {
        self.parent.is_none() && self.kind == SymbolKind::Module
    }
}
