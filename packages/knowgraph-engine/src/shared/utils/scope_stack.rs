//! Scope stack for qualified-name management
//!
//! Tracks nested definitions while an adapter walks a syntax tree. Each
//! entry remembers the symbol it belongs to so children can find their parent.

use crate::shared::models::SymbolId;

#[derive(Debug, Clone)]
struct Scope {
    name: String,
    symbol: SymbolId,
}

/// Scope stack for managing dotted qualified names
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Push a new scope
    pub fn push(&mut self, name: impl Into<String>, symbol: SymbolId) {
        self.scopes.push(Scope {
            name: name.into(),
            symbol,
        });
    }

    /// Pop the current scope
    pub fn pop(&mut self) -> Option<String> {
        self.scopes.pop().map(|s| s.name)
    }

    /// Current qualified name
    pub fn qualified(&self) -> String {
        self.scopes
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Qualified name with an additional trailing name
    pub fn qualified_with(&self, name: &str) -> String {
        if self.scopes.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.qualified(), name)
        }
    }

    /// Symbol owning the innermost scope
    pub fn current_symbol(&self) -> Option<SymbolId> {
        self.scopes.last().map(|s| s.symbol)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Execute a closure within a new scope
    pub fn with_scope<F, R>(&mut self, name: impl Into<String>, symbol: SymbolId, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.push(name, symbol);
        let result = f(self);
        self.pop();
        result
    }
}
