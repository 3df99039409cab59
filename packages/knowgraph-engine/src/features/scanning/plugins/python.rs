//! Python Language Plugin
//!
//! Docstrings are bare string statements; `#` comments group by line.
//! `decorated_definition` wraps classes and functions carrying decorators.

use tree_sitter::{Language as TSLanguage, Node as TSNode};

use super::field_text;
use crate::features::scanning::ports::{Definition, SyntaxHooks};
use crate::shared::models::SymbolKind;
use crate::shared::ports::LanguageId;

/// Python language plugin
#[derive(Debug, Default)]
pub struct PythonPlugin;

impl PythonPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxHooks for PythonPlugin {
    fn tree_sitter_language(&self) -> TSLanguage {
        tree_sitter_python::language()
    }

    fn language_id(&self) -> LanguageId {
        LanguageId::Python
    }

    fn is_comment(&self, node: &TSNode) -> bool {
        node.kind() == "comment"
    }

    fn is_docstring(&self, node: &TSNode) -> bool {
        node.kind() == "expression_statement"
            && node.named_child_count() == 1
            && node
                .named_child(0)
                .map(|c| matches!(c.kind(), "string" | "concatenated_string"))
                .unwrap_or(false)
    }

    fn unwrap<'t>(&self, node: TSNode<'t>) -> TSNode<'t> {
        if node.kind() == "decorated_definition" {
            node.child_by_field_name("definition").unwrap_or(node)
        } else {
            node
        }
    }

    fn definition<'t>(
        &self,
        node: TSNode<'t>,
        source: &str,
        container: SymbolKind,
    ) -> Option<Definition<'t>> {
        let kind = match node.kind() {
            "class_definition" => SymbolKind::Class,
            "function_definition" if container == SymbolKind::Class => SymbolKind::Method,
            "function_definition" => SymbolKind::Function,
            _ => return None,
        };
        let name = field_text(&node, "name", source)?;
        Some(Definition::new(name, kind).with_body(node.child_by_field_name("body")))
    }
}
