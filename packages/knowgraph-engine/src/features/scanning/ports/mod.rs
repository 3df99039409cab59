//! Scanning ports (interfaces)

mod language_adapter;

pub use language_adapter::{
    AdapterRegistry, Definition, LanguageAdapter, ScopeBlock, SpanExt, SyntaxHooks,
};
