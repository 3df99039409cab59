//! Scanning infrastructure
//!
//! This is where the tree-sitter dependency lives.

mod parser;
mod tree_walker;

pub use parser::{parse_source, TreeSitterAdapter};
pub use tree_walker::TreeWalker;
