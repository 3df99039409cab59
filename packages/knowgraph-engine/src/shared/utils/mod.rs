//! Shared utilities

pub mod id_generator;
pub mod scope_stack;

pub use id_generator::{module_path_for, normalize_path, IdGenerator};
pub use scope_stack::ScopeStack;
