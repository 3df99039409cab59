//! Go Language Plugin
//!
//! Methods are declared outside their type; the receiver type becomes the
//! method's owner and the walker re-parents it onto the type's symbol.

use tree_sitter::{Language as TSLanguage, Node as TSNode};

use super::{field_text, first_descendant, node_text};
use crate::features::scanning::ports::{Definition, SyntaxHooks};
use crate::shared::models::SymbolKind;
use crate::shared::ports::LanguageId;

/// Go language plugin
#[derive(Debug, Default)]
pub struct GoPlugin;

impl GoPlugin {
    pub fn new() -> Self {
        Self
    }

    /// `func (s *UserService) Handle()` → `UserService`
    fn receiver_type(node: &TSNode, source: &str) -> Option<String> {
        let receiver = node.child_by_field_name("receiver")?;
        first_descendant(receiver, "type_identifier").map(|t| node_text(&t, source).to_string())
    }
}

impl SyntaxHooks for GoPlugin {
    fn tree_sitter_language(&self) -> TSLanguage {
        tree_sitter_go::language()
    }

    fn language_id(&self) -> LanguageId {
        LanguageId::Go
    }

    fn is_comment(&self, node: &TSNode) -> bool {
        node.kind() == "comment"
    }

    fn definition<'t>(
        &self,
        node: TSNode<'t>,
        source: &str,
        _container: SymbolKind,
    ) -> Option<Definition<'t>> {
        match node.kind() {
            "type_declaration" => {
                let mut cursor = node.walk();
                let spec = node
                    .named_children(&mut cursor)
                    .find(|c| matches!(c.kind(), "type_spec" | "type_alias"))?;
                let name = field_text(&spec, "name", source)?;
                Some(Definition::new(name, SymbolKind::Class))
            }
            "function_declaration" => {
                let name = field_text(&node, "name", source)?;
                Some(
                    Definition::new(name, SymbolKind::Function)
                        .with_body(node.child_by_field_name("body")),
                )
            }
            "method_declaration" => {
                let name = field_text(&node, "name", source)?;
                Some(
                    Definition::new(name, SymbolKind::Method)
                        .with_body(node.child_by_field_name("body"))
                        .with_owner(Self::receiver_type(&node, source)),
                )
            }
            _ => None,
        }
    }
}
