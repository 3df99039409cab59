//! Shared tree walker
//!
//! Walks a tree-sitter syntax tree once, building the file's symbol table
//! and attributing every comment group and docstring to a symbol. Language
//! differences are confined to [`SyntaxHooks`].

use tree_sitter::Node as TSNode;

use crate::features::scanning::domain::TextSpan;
use crate::features::scanning::ports::{Definition, SpanExt, SyntaxHooks};
use crate::shared::models::{EnclosingSymbol, Span, SymbolId, SymbolKind};
use crate::shared::utils::ScopeStack;

/// Single-pass symbol and comment collector for one file
pub struct TreeWalker<'a, H: SyntaxHooks + ?Sized> {
    hooks: &'a H,
    source: &'a str,
    file_path: &'a str,
    symbols: Vec<EnclosingSymbol>,
    spans: Vec<TextSpan>,
    scopes: ScopeStack,
    /// Methods declared against a type from outside its body, with the
    /// type's qualified name; parent fixed up once every type is known
    owned: Vec<(SymbolId, String)>,
}

impl<'a, H: SyntaxHooks + ?Sized> TreeWalker<'a, H> {
    pub fn new(hooks: &'a H, source: &'a str, file_path: &'a str) -> Self {
        Self {
            hooks,
            source,
            file_path,
            symbols: Vec::new(),
            spans: Vec::new(),
            scopes: ScopeStack::new(),
            owned: Vec::new(),
        }
    }

    /// Walk the tree rooted at `root`; returns (symbols, spans)
    pub fn walk(mut self, root: TSNode<'_>, module_path: &str) -> (Vec<EnclosingSymbol>, Vec<TextSpan>) {
        let line_count = self.source.lines().count().max(1) as u32;
        self.symbols.push(EnclosingSymbol {
            id: 0,
            name: module_path.to_string(),
            qualified_name: String::new(),
            kind: SymbolKind::Module,
            span: Span::new(1, line_count),
            parent: None,
        });

        self.walk_body(root, Vec::new(), 0, SymbolKind::Module, true, None);
        self.resolve_owners();

        (self.symbols, self.spans)
    }

    /// Walk the direct named children of a body node, after any `leading`
    /// comments the grammar attached to the enclosing definition
    fn walk_body<'t>(
        &mut self,
        body: TSNode<'t>,
        leading: Vec<TSNode<'t>>,
        owner: SymbolId,
        container: SymbolKind,
        holds_docstring: bool,
        method_owner: Option<&str>,
    ) {
        let mut cursor = body.walk();
        let mut children = leading;
        children.extend(body.named_children(&mut cursor));

        // Pass 1: register definitions so comments can point forward at them
        let mut ids: Vec<Option<SymbolId>> = vec![None; children.len()];
        let mut defs: Vec<Option<Definition<'t>>> = Vec::with_capacity(children.len());
        for (i, node) in children.iter().enumerate() {
            if self.hooks.is_comment(node) || self.hooks.is_docstring(node) {
                defs.push(None);
                continue;
            }
            let inner = self.hooks.unwrap(*node);
            match self.hooks.definition(inner, self.source, container) {
                Some(def) => {
                    ids[i] = Some(self.add_symbol(node, &def, owner, method_owner));
                    defs.push(Some(def));
                }
                None => defs.push(None),
            }
        }

        // Pass 2: attribute comments, recurse into bodies
        let mut seen_statement = false;
        let mut i = 0;
        while i < children.len() {
            let node = children[i];

            if self.hooks.is_comment(&node) {
                let mut last_row = node.last_row();
                let mut j = i + 1;
                while j < children.len()
                    && self.hooks.is_comment(&children[j])
                    && children[j].first_row() <= last_row + 1
                {
                    last_row = children[j].last_row();
                    j += 1;
                }
                let target = self.adjacent_definition(&children, &ids, j, last_row);
                self.push_span(
                    node.start_byte(),
                    children[j - 1].end_byte(),
                    Span::new(node.first_row() as u32 + 1, last_row as u32 + 1),
                    target.unwrap_or(owner),
                    None,
                );
                i = j;
                continue;
            }

            if self.hooks.is_docstring(&node) {
                let target = self.adjacent_definition(&children, &ids, i + 1, node.last_row());
                if holds_docstring && !seen_statement {
                    self.push_span(node.start_byte(), node.end_byte(), node.to_span(), owner, target);
                } else {
                    self.push_span(
                        node.start_byte(),
                        node.end_byte(),
                        node.to_span(),
                        target.unwrap_or(owner),
                        None,
                    );
                }
                seen_statement = true;
                i += 1;
                continue;
            }

            seen_statement = true;

            if let (Some(symbol), Some(def)) = (ids[i], defs[i].take()) {
                if let Some(inner_body) = def.body {
                    let leading = self.hooks.leading_body_comments(self.hooks.unwrap(node), inner_body);
                    let segment = match (method_owner, def.owner.as_deref()) {
                        (None, Some(ty)) => format!("{}.{}", ty, def.name),
                        _ => def.name.clone(),
                    };
                    self.scopes.push(segment, symbol);
                    self.walk_body(inner_body, leading, symbol, def.kind, true, None);
                    self.scopes.pop();
                }
            } else if let Some(block) = self.hooks.scope_block(node, self.source) {
                self.scopes.push(block.owner.clone(), owner);
                self.walk_body(block.body, Vec::new(), owner, SymbolKind::Class, false, Some(block.owner.as_str()));
                self.scopes.pop();
            }

            i += 1;
        }
    }

    fn add_symbol(
        &mut self,
        node: &TSNode<'_>,
        def: &Definition<'_>,
        owner: SymbolId,
        method_owner: Option<&str>,
    ) -> SymbolId {
        let id = self.symbols.len();
        let qualified_name = match (method_owner, def.owner.as_deref()) {
            // already inside the owner's scope
            (Some(_), _) => {
                self.owned.push((id, self.scopes.qualified()));
                self.scopes.qualified_with(&def.name)
            }
            (None, Some(ty)) => {
                self.owned.push((id, self.scopes.qualified_with(ty)));
                self.scopes.qualified_with(&format!("{}.{}", ty, def.name))
            }
            (None, None) => self.scopes.qualified_with(&def.name),
        };

        self.symbols.push(EnclosingSymbol {
            id,
            name: def.name.clone(),
            qualified_name,
            kind: def.kind,
            span: node.to_span(),
            parent: Some(owner),
        });
        id
    }

    /// Definition starting right after `last_row`, skipping decorations
    fn adjacent_definition(
        &self,
        children: &[TSNode<'_>],
        ids: &[Option<SymbolId>],
        from: usize,
        last_row: usize,
    ) -> Option<SymbolId> {
        let mut row = last_row;
        for (k, child) in children.iter().enumerate().skip(from) {
            if child.first_row() > row + 1 {
                return None;
            }
            if let Some(id) = ids[k] {
                return Some(id);
            }
            if self.hooks.is_decoration(child) {
                row = child.last_row();
                continue;
            }
            return None;
        }
        None
    }

    fn push_span(
        &mut self,
        start_byte: usize,
        end_byte: usize,
        span: Span,
        symbol: SymbolId,
        adjacent: Option<SymbolId>,
    ) {
        let text = self.source.get(start_byte..end_byte).unwrap_or("").to_string();
        self.spans.push(TextSpan {
            file_path: self.file_path.to_string(),
            span,
            text,
            symbol: Some(symbol),
            adjacent: adjacent.filter(|a| *a != symbol),
        });
    }

    /// Re-parent methods declared outside their type's body
    fn resolve_owners(&mut self) {
        for (id, owner_name) in std::mem::take(&mut self.owned) {
            let class = self
                .symbols
                .iter()
                .find(|s| s.kind == SymbolKind::Class && s.qualified_name == owner_name)
                .map(|s| s.id);
            if let Some(class_id) = class {
                self.symbols[id].parent = Some(class_id);
            }
        }
    }
}
