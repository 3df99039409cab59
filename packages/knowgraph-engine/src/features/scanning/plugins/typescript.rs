//! TypeScript / JavaScript Language Plugin
//!
//! JavaScript is parsed with the TypeScript grammar; `.tsx`/`.jsx` use the
//! TSX grammar.

use tree_sitter::{Language as TSLanguage, Node as TSNode};

use super::field_text;
use crate::features::scanning::ports::{Definition, SyntaxHooks};
use crate::shared::models::SymbolKind;
use crate::shared::ports::{extension_of, LanguageId};

/// TypeScript language plugin
#[derive(Debug, Default)]
pub struct TypeScriptPlugin;

impl TypeScriptPlugin {
    pub fn new() -> Self {
        Self
    }

    /// `const handler = async () => { .. }` and `let f = function () {}`
    fn function_variable<'t>(node: &TSNode<'t>, source: &str) -> Option<Definition<'t>> {
        let mut cursor = node.walk();
        let declarators: Vec<TSNode<'t>> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "variable_declarator")
            .collect();

        declarators.into_iter().find_map(|decl| {
            let value = decl.child_by_field_name("value")?;
            if !matches!(
                value.kind(),
                "arrow_function" | "function_expression" | "function" | "generator_function"
            ) {
                return None;
            }
            let name = field_text(&decl, "name", source)?;
            Some(
                Definition::new(name, SymbolKind::Function)
                    .with_body(value.child_by_field_name("body")),
            )
        })
    }
}

impl SyntaxHooks for TypeScriptPlugin {
    fn tree_sitter_language(&self) -> TSLanguage {
        tree_sitter_typescript::language_typescript()
    }

    fn tree_sitter_language_for(&self, file_path: &str) -> TSLanguage {
        match extension_of(file_path).map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("tsx") | Some("jsx") => tree_sitter_typescript::language_tsx(),
            _ => tree_sitter_typescript::language_typescript(),
        }
    }

    fn language_id(&self) -> LanguageId {
        LanguageId::TypeScript
    }

    fn is_comment(&self, node: &TSNode) -> bool {
        node.kind() == "comment"
    }

    fn is_decoration(&self, node: &TSNode) -> bool {
        node.kind() == "decorator"
    }

    fn unwrap<'t>(&self, node: TSNode<'t>) -> TSNode<'t> {
        if node.kind() == "export_statement" {
            node.child_by_field_name("declaration")
                .or_else(|| node.child_by_field_name("value"))
                .unwrap_or(node)
        } else {
            node
        }
    }

    fn definition<'t>(
        &self,
        node: TSNode<'t>,
        source: &str,
        _container: SymbolKind,
    ) -> Option<Definition<'t>> {
        match node.kind() {
            "class_declaration"
            | "abstract_class_declaration"
            | "class"
            | "interface_declaration" => {
                let name = field_text(&node, "name", source)?;
                Some(
                    Definition::new(name, SymbolKind::Class)
                        .with_body(node.child_by_field_name("body")),
                )
            }
            "function_declaration" | "generator_function_declaration" => {
                let name = field_text(&node, "name", source)?;
                Some(
                    Definition::new(name, SymbolKind::Function)
                        .with_body(node.child_by_field_name("body")),
                )
            }
            "method_definition" | "abstract_method_signature" => {
                let name = field_text(&node, "name", source)?;
                Some(
                    Definition::new(name, SymbolKind::Method)
                        .with_body(node.child_by_field_name("body")),
                )
            }
            "lexical_declaration" | "variable_declaration" => Self::function_variable(&node, source),
            _ => None,
        }
    }
}
