//! Language plugins
//!
//! Each language supplies [`SyntaxHooks`](crate::features::scanning::ports::SyntaxHooks)
//! and is wrapped in a [`TreeSitterAdapter`]. Files no plugin claims go to
//! the [`FallbackAdapter`].

pub mod fallback;
pub mod go;
pub mod java;
pub mod python;
pub mod rust_lang;
pub mod typescript;

pub use fallback::FallbackAdapter;
pub use go::GoPlugin;
pub use java::JavaPlugin;
pub use python::PythonPlugin;
pub use rust_lang::RustPlugin;
pub use typescript::TypeScriptPlugin;

use tree_sitter::Node as TSNode;

use crate::features::scanning::infrastructure::TreeSitterAdapter;
use crate::features::scanning::ports::AdapterRegistry;
use crate::shared::ports::LanguageId;

/// Create a registry with all language plugins and the fallback registered
pub fn create_full_registry() -> AdapterRegistry {
    create_registry(&LanguageId::ALL, true)
}

/// Create a registry with only specific languages
pub fn create_registry(languages: &[LanguageId], fallback: bool) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    for lang in languages {
        match lang {
            LanguageId::Python => registry.register(Box::new(TreeSitterAdapter::new(PythonPlugin::new()))),
            LanguageId::Java => registry.register(Box::new(TreeSitterAdapter::new(JavaPlugin::new()))),
            LanguageId::Go => registry.register(Box::new(TreeSitterAdapter::new(GoPlugin::new()))),
            LanguageId::TypeScript => {
                registry.register(Box::new(TreeSitterAdapter::new(TypeScriptPlugin::new())))
            }
            LanguageId::Rust => registry.register(Box::new(TreeSitterAdapter::new(RustPlugin::new()))),
        }
    }
    if fallback {
        registry.register(Box::new(FallbackAdapter::new()));
    }
    registry
}

/// Get node text from source
pub(crate) fn node_text<'s>(node: &TSNode, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Text of a node's `name` field
pub(crate) fn field_text(node: &TSNode, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| node_text(&n, source).to_string())
        .filter(|s| !s.is_empty())
}

/// First descendant (pre-order, self included) of the given kind
pub(crate) fn first_descendant<'t>(node: TSNode<'t>, kind: &str) -> Option<TSNode<'t>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<TSNode<'t>> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(|c| first_descendant(c, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_registry_covers_all_languages() {
        let registry = create_full_registry();
        assert_eq!(registry.languages(), {
            let mut all = LanguageId::ALL.to_vec();
            all.sort();
            all
        });
        assert!(registry.has_fallback());
        assert_eq!(
            registry.adapter_for("src/app.tsx").and_then(|a| a.language_id()),
            Some(LanguageId::TypeScript)
        );
        assert_eq!(
            registry.adapter_for("notes/README.md").map(|a| a.name()),
            Some("fallback")
        );
    }

    #[test]
    fn test_registry_without_fallback_skips_unknown() {
        let registry = create_registry(&[LanguageId::Python], false);
        assert!(registry.adapter_for("main.py").is_some());
        assert!(registry.adapter_for("Main.java").is_none());
        assert!(registry.adapter_for("Makefile").is_none());
    }
}
