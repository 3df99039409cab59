//! Language Adapter Port
//!
//! Defines the contract for language-specific scanning. A language either
//! implements [`LanguageAdapter`] directly (the fallback adapter does) or
//! supplies [`SyntaxHooks`] and lets the shared tree walker do the rest.

use std::collections::HashMap;
use tree_sitter::{Language as TSLanguage, Node as TSNode};

use crate::features::scanning::domain::ScannedFile;
use crate::shared::models::{Span, SymbolKind};
use crate::shared::ports::{extension_of, LanguageId};

/// A definition recognised by a language's hooks
#[derive(Debug, Clone)]
pub struct Definition<'t> {
    pub name: String,
    pub kind: SymbolKind,
    /// Node whose direct children are walked for nested definitions
    pub body: Option<TSNode<'t>>,
    /// Type a method is declared against from outside its body
    /// (Go receivers, Rust `impl` targets)
    pub owner: Option<String>,
}

impl<'t> Definition<'t> {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            body: None,
            owner: None,
        }
    }

    pub fn with_body(mut self, body: Option<TSNode<'t>>) -> Self {
        self.body = body;
        self
    }

    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }
}

/// A block that scopes definitions without being a symbol itself
/// (Rust `impl Foo { .. }`)
#[derive(Debug, Clone)]
pub struct ScopeBlock<'t> {
    pub owner: String,
    pub body: TSNode<'t>,
}

/// Scanner contract: one implementation per language
pub trait LanguageAdapter: Send + Sync {
    /// Language handled, `None` for the fallback adapter
    fn language_id(&self) -> Option<LanguageId>;

    /// Human-readable adapter name for logs
    fn name(&self) -> &'static str {
        self.language_id().map(|l| l.name()).unwrap_or("fallback")
    }

    /// Get supported file extensions
    fn extensions(&self) -> &[&str] {
        self.language_id().map(|l| l.extensions()).unwrap_or(&[])
    }

    /// Check if this adapter supports a file extension
    fn supports(&self, ext: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Locate every comment/docstring region and the symbol it documents.
    /// Never fails: malformed syntax yields a best-effort result.
    fn locate(&self, file_path: &str, source: &str) -> ScannedFile;
}

/// Tree-sitter hooks consumed by the shared tree walker
///
/// Defaults cover the common tree-sitter grammar conventions; each language
/// overrides what differs.
pub trait SyntaxHooks: Send + Sync {
    /// Get the tree-sitter language
    fn tree_sitter_language(&self) -> TSLanguage;

    /// Grammar for a specific file, when one language spans several grammars
    fn tree_sitter_language_for(&self, _file_path: &str) -> TSLanguage {
        self.tree_sitter_language()
    }

    /// Get the language identifier
    fn language_id(&self) -> LanguageId;

    /// Comment node (line or block)
    fn is_comment(&self, node: &TSNode) -> bool {
        matches!(node.kind(), "comment" | "line_comment" | "block_comment")
    }

    /// Statement that is a bare string literal used as documentation
    fn is_docstring(&self, _node: &TSNode) -> bool {
        false
    }

    /// Node that may sit between a comment and the definition it documents
    /// (attributes, annotations)
    fn is_decoration(&self, _node: &TSNode) -> bool {
        false
    }

    /// Strip wrappers (export statements, decorators) down to the
    /// definition node. The wrapper still provides the symbol's span.
    fn unwrap<'t>(&self, node: TSNode<'t>) -> TSNode<'t> {
        node
    }

    /// Recognise a definition. `container` is the kind of the symbol whose
    /// body is being walked.
    fn definition<'t>(
        &self,
        node: TSNode<'t>,
        source: &str,
        container: SymbolKind,
    ) -> Option<Definition<'t>>;

    /// Recognise a non-symbol scoping block
    fn scope_block<'t>(&self, _node: TSNode<'t>, _source: &str) -> Option<ScopeBlock<'t>> {
        None
    }

    /// Comments the grammar hangs on the definition node itself, between its
    /// header and `body` (tree-sitter-python puts comments that open an
    /// indented block here). They are walked as the first children of the
    /// body. Comments trailing a header line are left out.
    fn leading_body_comments<'t>(&self, definition: TSNode<'t>, body: TSNode<'t>) -> Vec<TSNode<'t>> {
        let mut cursor = definition.walk();
        definition
            .named_children(&mut cursor)
            .filter(|c| self.is_comment(c) && c.end_byte() <= body.start_byte())
            .filter(|c| {
                c.prev_sibling()
                    .map_or(true, |prev| prev.end_position().row < c.start_position().row)
            })
            .collect()
    }
}

/// Language adapter registry
pub struct AdapterRegistry {
    adapters: HashMap<LanguageId, Box<dyn LanguageAdapter>>,
    fallback: Option<Box<dyn LanguageAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            fallback: None,
        }
    }

    /// Register an adapter. An adapter without a language becomes the
    /// fallback for unsupported files.
    pub fn register(&mut self, adapter: Box<dyn LanguageAdapter>) {
        match adapter.language_id() {
            Some(lang) => {
                self.adapters.insert(lang, adapter);
            }
            None => self.fallback = Some(adapter),
        }
    }

    /// Get adapter by language ID
    pub fn get(&self, lang: LanguageId) -> Option<&dyn LanguageAdapter> {
        self.adapters.get(&lang).map(|a| a.as_ref())
    }

    /// Get adapter by file extension
    pub fn get_by_extension(&self, ext: &str) -> Option<&dyn LanguageAdapter> {
        let lang = LanguageId::from_extension(ext)?;
        self.get(lang)
    }

    /// Adapter for a path: the language adapter if one matches, otherwise
    /// the fallback. `None` means the file is skipped.
    pub fn adapter_for(&self, file_path: &str) -> Option<&dyn LanguageAdapter> {
        extension_of(file_path)
            .and_then(|ext| self.get_by_extension(ext))
            .or(self.fallback.as_deref())
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Registered languages, sorted
    pub fn languages(&self) -> Vec<LanguageId> {
        let mut langs: Vec<LanguageId> = self.adapters.keys().copied().collect();
        langs.sort();
        langs
    }

    /// Check if any adapter supports the extension
    pub fn supports(&self, ext: &str) -> bool {
        self.get_by_extension(ext).is_some()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper trait for extracting line spans from tree-sitter nodes
pub trait SpanExt {
    /// Zero-based row of the node's first character
    fn first_row(&self) -> usize;

    /// Zero-based row of the node's last character. Tokens that swallow
    /// their trailing newline end at column 0 of the next row; that row is
    /// not counted.
    fn last_row(&self) -> usize;

    /// One-based inclusive line span
    fn to_span(&self) -> Span {
        Span::new(self.first_row() as u32 + 1, self.last_row() as u32 + 1)
    }
}

impl SpanExt for TSNode<'_> {
    fn first_row(&self) -> usize {
        self.start_position().row
    }

    fn last_row(&self) -> usize {
        let end = self.end_position();
        if end.column == 0 && end.row > self.start_position().row {
            end.row - 1
        } else {
            end.row
        }
    }
}
