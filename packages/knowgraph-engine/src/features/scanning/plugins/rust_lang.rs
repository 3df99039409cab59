//! Rust Language Plugin

use tree_sitter::{Language as TSLanguage, Node as TSNode};

use super::{field_text, first_descendant, node_text};
use crate::features::scanning::ports::{Definition, ScopeBlock, SyntaxHooks};
use crate::shared::models::SymbolKind;
use crate::shared::ports::LanguageId;

/// Rust language plugin
#[derive(Debug, Default)]
pub struct RustPlugin;

impl RustPlugin {
    pub fn new() -> Self {
        Self
    }

    /// `impl<T> Display for Wrapper<T>` → `Wrapper`
    fn impl_target(node: &TSNode, source: &str) -> Option<String> {
        let ty = node.child_by_field_name("type")?;
        let ident = match ty.kind() {
            "type_identifier" => Some(ty),
            "generic_type" => ty
                .child_by_field_name("type")
                .and_then(|t| first_descendant(t, "type_identifier")),
            "scoped_type_identifier" => ty.child_by_field_name("name"),
            _ => first_descendant(ty, "type_identifier"),
        }?;
        Some(node_text(&ident, source).to_string())
    }
}

impl SyntaxHooks for RustPlugin {
    fn tree_sitter_language(&self) -> TSLanguage {
        tree_sitter_rust::language()
    }

    fn language_id(&self) -> LanguageId {
        LanguageId::Rust
    }

    fn is_comment(&self, node: &TSNode) -> bool {
        matches!(node.kind(), "line_comment" | "block_comment")
    }

    fn is_decoration(&self, node: &TSNode) -> bool {
        node.kind() == "attribute_item"
    }

    fn definition<'t>(
        &self,
        node: TSNode<'t>,
        source: &str,
        container: SymbolKind,
    ) -> Option<Definition<'t>> {
        match node.kind() {
            "struct_item" | "enum_item" | "union_item" | "type_item" => {
                let name = field_text(&node, "name", source)?;
                Some(Definition::new(name, SymbolKind::Class))
            }
            "trait_item" => {
                let name = field_text(&node, "name", source)?;
                Some(
                    Definition::new(name, SymbolKind::Class)
                        .with_body(node.child_by_field_name("body")),
                )
            }
            "function_item" | "function_signature_item" => {
                let name = field_text(&node, "name", source)?;
                let kind = if container == SymbolKind::Class {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                };
                Some(Definition::new(name, kind).with_body(node.child_by_field_name("body")))
            }
            // `mod foo;` declares a file elsewhere; only inline modules are scopes here
            "mod_item" => {
                let body = node.child_by_field_name("body")?;
                let name = field_text(&node, "name", source)?;
                Some(Definition::new(name, SymbolKind::Module).with_body(Some(body)))
            }
            _ => None,
        }
    }

    fn scope_block<'t>(&self, node: TSNode<'t>, source: &str) -> Option<ScopeBlock<'t>> {
        if node.kind() != "impl_item" {
            return None;
        }
        Some(ScopeBlock {
            owner: Self::impl_target(&node, source)?,
            body: node.child_by_field_name("body")?,
        })
    }
}
