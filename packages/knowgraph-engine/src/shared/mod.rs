//! Shared module - Common types and utilities
//!
//! Types shared by every feature slice (scanning, extraction, schema,
//! graph building). Nothing in here knows about tree-sitter or YAML.

pub mod models;
pub mod ports;
pub mod utils;

// Re-exports for convenience
pub use models::*;
pub use ports::LanguageId;
pub use utils::id_generator::IdGenerator;
pub use utils::scope_stack::ScopeStack;
