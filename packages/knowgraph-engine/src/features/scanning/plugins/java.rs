//! Java Language Plugin
//!
//! Javadoc and block comments precede declarations as siblings; annotations
//! live inside the declaration's `modifiers`, so they never split a comment
//! from its declaration.

use tree_sitter::{Language as TSLanguage, Node as TSNode};

use super::field_text;
use crate::features::scanning::ports::{Definition, SyntaxHooks};
use crate::shared::models::SymbolKind;
use crate::shared::ports::LanguageId;

/// Java language plugin
#[derive(Debug, Default)]
pub struct JavaPlugin;

impl JavaPlugin {
    pub fn new() -> Self {
        Self
    }

    /// Enum methods sit one level down, in `enum_body_declarations`
    fn type_body<'t>(node: &TSNode<'t>) -> Option<TSNode<'t>> {
        let body = node.child_by_field_name("body")?;
        if body.kind() != "enum_body" {
            return Some(body);
        }
        let mut cursor = body.walk();
        let decls = body
            .named_children(&mut cursor)
            .find(|c| c.kind() == "enum_body_declarations");
        decls.or(Some(body))
    }
}

impl SyntaxHooks for JavaPlugin {
    fn tree_sitter_language(&self) -> TSLanguage {
        tree_sitter_java::language()
    }

    fn language_id(&self) -> LanguageId {
        LanguageId::Java
    }

    fn is_comment(&self, node: &TSNode) -> bool {
        matches!(node.kind(), "line_comment" | "block_comment")
    }

    fn definition<'t>(
        &self,
        node: TSNode<'t>,
        source: &str,
        _container: SymbolKind,
    ) -> Option<Definition<'t>> {
        match node.kind() {
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => {
                let name = field_text(&node, "name", source)?;
                Some(Definition::new(name, SymbolKind::Class).with_body(Self::type_body(&node)))
            }
            "method_declaration" | "constructor_declaration" => {
                let name = field_text(&node, "name", source)?;
                Some(
                    Definition::new(name, SymbolKind::Method)
                        .with_body(node.child_by_field_name("body")),
                )
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::scanning::domain::ScannedFile;
    use crate::features::scanning::infrastructure::TreeSitterAdapter;
    use crate::features::scanning::ports::LanguageAdapter;
    use crate::shared::models::Span;

    fn locate(source: &str) -> ScannedFile {
        TreeSitterAdapter::new(JavaPlugin::new())
            .locate("src/com/example/PaymentService.java", source)
    }

    const SOURCE: &str = r#"package com.example.payments;

/**
 * @knowgraph
 * type: class
 */
@Service
public class PaymentService {

    /**
     * @knowgraph
     * type: method
     */
    @Override
    public PaymentResult processPayment(String customerId) {
        // Implementation omitted
        throw new UnsupportedOperationException();
    }

    public PaymentService() {}
}
"#;

    #[test]
    fn test_javadoc_attaches_to_class_and_method() {
        let file = locate(SOURCE);

        let class = file.find("PaymentService").unwrap();
        assert_eq!(class.kind, SymbolKind::Class);
        assert_eq!(class.span, Span::new(7, 21));

        let method = file.find("PaymentService.processPayment").unwrap();
        assert_eq!(method.kind, SymbolKind::Method);
        assert_eq!(method.parent, Some(class.id));

        let docs: Vec<_> = file.spans().filter(|s| s.text.starts_with("/**")).collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].symbol, Some(class.id));
        assert_eq!(docs[0].span, Span::new(3, 6));
        assert_eq!(docs[1].symbol, Some(method.id));
    }

    #[test]
    fn test_constructor_is_method_and_body_comments_stay_inside() {
        let file = locate(SOURCE);

        let ctor = file
            .symbols
            .iter()
            .filter(|s| s.qualified_name == "PaymentService.PaymentService")
            .count();
        assert_eq!(ctor, 1);

        let inner = file
            .spans()
            .find(|s| s.text.contains("Implementation omitted"))
            .unwrap();
        assert_eq!(
            inner.symbol.and_then(|id| file.symbol(id)).map(|s| s.name.as_str()),
            Some("processPayment")
        );
    }
}
