//! End-to-end scans of the annotated fixture trees

mod common;

use common::*;
use knowgraph_engine::{DiagnosticKind, EdgeKind, Engine, SourceFile, Status, SymbolKind};
use pretty_assertions::assert_eq;

#[test]
fn test_fastapi_tree_scans_cleanly() {
    let outcome = Engine::new().scan_root(fixture_dir("python-fastapi")).unwrap();
    assert_no_diagnostics(&outcome);
    assert_eq!(outcome.files_scanned, 10);
    assert_eq!(outcome.graph.node_count(), 37);

    let create = node(&outcome.graph, "routers.orders.create_order");
    assert_eq!(create.kind, SymbolKind::Function);
    assert_eq!(create.owner(), Some("orders-team"));
    assert_eq!(create.file, "routers/orders.py");
    assert!(create.variants.contains("knowgraph"));
}

#[test]
fn test_fastapi_edges() {
    let outcome = Engine::new().scan_root(fixture_dir("python-fastapi")).unwrap();
    let graph = &outcome.graph;

    assert_eq!(
        edge_targets(graph, "routers.orders", EdgeKind::Contains),
        {
            let mut expected = vec![
                "routers.orders.cancel_order".to_string(),
                "routers.orders.create_order".to_string(),
                "routers.orders.get_order".to_string(),
                "routers.orders.list_orders".to_string(),
            ];
            expected.sort_by_key(|fqn| node(graph, fqn).id.clone());
            expected
        }
    );
    assert_eq!(
        edge_targets(graph, "routers.orders.create_order", EdgeKind::DependsOnService),
        vec!["inventory-service", "payment-service"]
    );
    assert_eq!(
        edge_targets(graph, "main", EdgeKind::DependsOnDatabase),
        vec!["postgres-main", "redis-cache"]
    );

    let link = graph
        .edges_from(&node(graph, "auth").id)
        .find(|e| e.kind == EdgeKind::LinksToDoc && e.target.as_str() == "https://notion.so/auth-design")
        .expect("auth design link");
    assert_eq!(link.attributes.get("type").map(String::as_str), Some("notion"));
    assert_eq!(
        link.attributes.get("title").map(String::as_str),
        Some("Authentication Design Document")
    );

    let payment_dependents: Vec<&str> = graph
        .dependents_of("payment-service")
        .iter()
        .map(|n| n.fqn.as_str())
        .collect();
    assert!(payment_dependents.contains(&"main"));
    assert!(payment_dependents.contains(&"routers.orders.cancel_order"));
}

#[test]
fn test_polyglot_comment_styles() {
    let outcome = Engine::new().scan_root(fixture_dir("polyglot")).unwrap();
    assert_no_diagnostics(&outcome);
    let graph = &outcome.graph;

    // Java: javadoc above the class and each method
    let service = node(graph, "PaymentService.PaymentService");
    assert_eq!(service.kind, SymbolKind::Class);
    assert_eq!(service.record.operational.as_ref().and_then(|o| o.sla.as_deref()), Some("99.99%"));
    let mut methods = edge_targets(graph, "PaymentService.PaymentService", EdgeKind::Contains);
    methods.sort();
    assert_eq!(
        methods,
        vec![
            "PaymentService.PaymentService.manageSubscription",
            "PaymentService.PaymentService.processPayment",
            "PaymentService.PaymentService.processRefund",
        ]
    );
    assert_eq!(
        node(graph, "PaymentService.PaymentService.manageSubscription").record.status,
        Some(Status::Experimental)
    );

    // Go: `// knowgraph:` line-comment groups
    let handler = node(graph, "handler");
    assert_eq!(handler.kind, SymbolKind::Module);
    assert_eq!(handler.owner(), Some("auth-team"));
    let mut handlers = edge_targets(graph, "handler", EdgeKind::Contains);
    handlers.sort();
    assert_eq!(handlers, vec!["handler.HandleLogin", "handler.HandleRegister"]);

    // Python: module docstring and function docstrings
    assert_eq!(node(graph, "example_service").kind, SymbolKind::Module);
    assert_eq!(
        edge_targets(graph, "example_service.register_user", EdgeKind::DependsOnService),
        vec!["email-service"]
    );
    assert_eq!(graph.node_count(), 4 + 3 + 4);
}

#[test]
fn test_legacy_sample_duplicate_is_warning() {
    let outcome = Engine::new().scan_root(fixture_dir("legacy")).unwrap();
    assert_eq!(diagnostic_kinds(&outcome), vec![DiagnosticKind::DuplicateAnnotation]);
    assert!(!outcome.diagnostics.has_errors());

    let graph = &outcome.graph;
    assert_eq!(
        fqns(graph),
        vec!["sample.SampleClass", "sample.SampleClass.method_one", "sample.sample_function"]
    );
    // Module docstring comes first and wins
    let function = node(graph, "sample.sample_function");
    assert_eq!(function.record.description, "A sample function for testing");
    assert_eq!(function.record.tag_set().into_iter().collect::<Vec<_>>(), vec!["sample", "testing"]);
    assert_eq!(
        edge_targets(graph, "sample.SampleClass", EdgeKind::Contains),
        vec!["sample.SampleClass.method_one"]
    );
}

#[test]
fn test_unannotated_file_yields_nothing() {
    let outcome = Engine::new().scan_root(fixture_dir("plain")).unwrap();
    assert_no_diagnostics(&outcome);
    assert!(outcome.graph.is_empty());

    let coverage = outcome.coverage.file("main.py").unwrap();
    assert_eq!(coverage.annotated, 0);
    assert_eq!(coverage.unannotated, vec!["main", "main.main"]);
}

#[test]
fn test_coverage_over_fastapi_tree() {
    let outcome = Engine::new().scan_root(fixture_dir("python-fastapi")).unwrap();
    let report = &outcome.coverage;
    assert_eq!(report.annotated_symbols, 37);
    assert!(report.total_symbols > report.annotated_symbols);
    // Plain docstrings do not count
    assert!(report.unannotated().any(|fqn| fqn == "auth.CurrentUser"));
    assert!(report.ratio() > 0.5 && report.ratio() < 1.0);
}

#[test]
fn test_comment_annotations_opening_class_body() {
    let source = "class C:\n    # @knowgraph\n    # type: method\n    # description: plain\n    def s(self):\n        pass\n\n\nclass D:\n    # @knowgraph\n    # type: method\n    # description: static\n    @staticmethod\n    def t():\n        pass\n";
    let outcome = Engine::new()
        .scan_sources(&[SourceFile::new("c.py", source)])
        .unwrap();

    assert_no_diagnostics(&outcome);
    assert_eq!(fqns(&outcome.graph), vec!["c.C.s", "c.D.t"]);
    assert_eq!(node(&outcome.graph, "c.D.t").kind, SymbolKind::Method);
}
