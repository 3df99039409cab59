//! Scanner output models

use crate::shared::models::{EnclosingSymbol, Span, SymbolId, SymbolKind};
use crate::shared::LanguageId;

/// A contiguous comment or docstring region of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub file_path: String,
    pub span: Span,
    /// Raw source text of the region, comment leaders included
    pub text: String,
    /// Symbol the region documents (`None` when the file has no symbol table)
    pub symbol: Option<SymbolId>,
    /// Definition starting on the line right after this region, when that
    /// definition is not already `symbol`. Lets the resolver re-target a
    /// module docstring that really describes the function below it.
    pub adjacent: Option<SymbolId>,
}

/// Everything the scanner learned about one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub file_path: String,
    /// Dotted module path derived from the file path
    pub module_path: String,
    /// `None` for files handled by the fallback adapter
    pub language: Option<LanguageId>,
    /// Symbol table; a symbol's id is its index. Index 0 is the module
    /// symbol whenever the table is non-empty.
    pub symbols: Vec<EnclosingSymbol>,
    spans: Vec<TextSpan>,
    pub has_syntax_errors: bool,
}

impl ScannedFile {
    pub fn new(
        file_path: impl Into<String>,
        module_path: impl Into<String>,
        language: Option<LanguageId>,
        symbols: Vec<EnclosingSymbol>,
        mut spans: Vec<TextSpan>,
    ) -> Self {
        spans.sort_by_key(|s| s.span);
        Self {
            file_path: file_path.into(),
            module_path: module_path.into(),
            language,
            symbols,
            spans,
            has_syntax_errors: false,
        }
    }

    /// File without a symbol table: the whole content is one span
    pub fn unstructured(
        file_path: impl Into<String>,
        module_path: impl Into<String>,
        language: Option<LanguageId>,
        source: &str,
    ) -> Self {
        let file_path = file_path.into();
        let line_count = source.lines().count().max(1) as u32;
        let spans = if source.trim().is_empty() {
            Vec::new()
        } else {
            vec![TextSpan {
                file_path: file_path.clone(),
                span: Span::new(1, line_count),
                text: source.to_string(),
                symbol: None,
                adjacent: None,
            }]
        };
        Self::new(file_path, module_path, language, Vec::new(), spans)
    }

    pub fn with_syntax_errors(mut self, has_errors: bool) -> Self {
        self.has_syntax_errors = has_errors;
        self
    }

    /// Text spans in source order. Restartable: every call iterates afresh.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> + '_ {
        self.spans.iter()
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&EnclosingSymbol> {
        self.symbols.get(id)
    }

    pub fn module_symbol(&self) -> Option<&EnclosingSymbol> {
        self.symbols.first().filter(|s| s.kind == SymbolKind::Module)
    }

    pub fn parent_of(&self, id: SymbolId) -> Option<&EnclosingSymbol> {
        self.symbol(id)
            .and_then(|s| s.parent)
            .and_then(|p| self.symbol(p))
    }

    pub fn children_of(&self, id: SymbolId) -> impl Iterator<Item = &EnclosingSymbol> + '_ {
        self.symbols.iter().filter(move |s| s.parent == Some(id))
    }

    /// Symbol by qualified name (`""` is the module)
    pub fn find(&self, qualified_name: &str) -> Option<&EnclosingSymbol> {
        self.symbols
            .iter()
            .find(|s| s.qualified_name == qualified_name)
    }
}
