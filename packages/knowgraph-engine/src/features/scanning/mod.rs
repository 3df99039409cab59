//! Source Lexical Scanner
//!
//! Turns a source file into comment/docstring text spans, each tied to the
//! code symbol it documents, plus the file's symbol containment tree.
//!
//! ## Structure
//! - `domain/` - TextSpan, ScannedFile
//! - `ports/` - LanguageAdapter / SyntaxHooks traits, AdapterRegistry
//! - `infrastructure/` - tree-sitter parsing and the shared tree walker
//! - `plugins/` - Per-language hooks and the fallback adapter

pub mod domain;
pub mod infrastructure;
pub mod plugins;
pub mod ports;

pub use domain::{ScannedFile, TextSpan};
pub use infrastructure::TreeSitterAdapter;
pub use plugins::{
    create_full_registry, create_registry, FallbackAdapter, GoPlugin, JavaPlugin, PythonPlugin,
    RustPlugin, TypeScriptPlugin,
};
pub use ports::{AdapterRegistry, Definition, LanguageAdapter, SyntaxHooks};
