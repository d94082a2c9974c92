// SPDX-License-Identifier: MIT OR Apache-2.0

use flowql_core::{CancellationToken, Compilation, Span, TreeProvider, Value};
use flowql_matcher::{KindScheme, QueryContext};
use flowql_selectors::KindAlias;

/// A tiny fake compilation: `ReportsController` (node 1) with one action,
/// `GetReport` (node 2), decorated with `[Route]` and `[HttpGet]`
/// attributes (symbols 100/101). Exercises the controller and
/// controller-action rules end to end, including route canonicalization.
struct FakeCompilation;

const ROOT: usize = 0;
const CONTROLLER: usize = 1;
const ACTION: usize = 2;
const ROUTE_ATTR: usize = 100;
const HTTP_GET_ATTR: usize = 101;

impl TreeProvider for FakeCompilation {
    type Node = usize;
    type Symbol = usize;

    fn kind_of(&self, node: Self::Node) -> &str {
        match node {
            CONTROLLER => "ClassDeclaration",
            ACTION => "MethodDeclaration",
            _ => "CompilationUnit",
        }
    }
    fn children_of(&self, node: Self::Node) -> Vec<Self::Node> {
        match node {
            ROOT => vec![CONTROLLER],
            CONTROLLER => vec![ACTION],
            _ => Vec::new(),
        }
    }
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node> {
        match node {
            CONTROLLER => Some(ROOT),
            ACTION => Some(CONTROLLER),
            _ => None,
        }
    }
    fn identifier_text_of(&self, node: Self::Node) -> Option<String> {
        self.symbol_property(node, "Name").and_then(|v| v.as_match_string())
    }
    fn span_of(&self, _node: Self::Node) -> Option<Span> {
        Some(Span { start_offset: 0, end_offset: 10, start_line: 1, end_line: 1 })
    }
    fn file_path_of(&self, _node: Self::Node) -> Option<String> {
        Some("Reports.cs".to_string())
    }
    fn declared_symbol(&self, node: Self::Node) -> Option<Self::Symbol> {
        matches!(node, CONTROLLER | ACTION).then_some(node)
    }
    fn bound_symbol(&self, node: Self::Node) -> Option<Self::Symbol> {
        self.declared_symbol(node)
    }
    fn type_info(&self, _node: Self::Node) -> Option<Self::Symbol> {
        None
    }
    fn constant_value(&self, _node: Self::Node) -> Option<Value> {
        None
    }
    fn attributes_of(&self, symbol: Self::Symbol) -> Vec<Self::Symbol> {
        match symbol {
            CONTROLLER => vec![ROUTE_ATTR],
            ACTION => vec![HTTP_GET_ATTR],
            _ => Vec::new(),
        }
    }
    fn base_types_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }
    fn interfaces_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }
    fn members_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }
    fn node_property(&self, node: Self::Node, name: &str) -> Option<Value> {
        self.symbol_property(node, name)
    }
    fn symbol_property(&self, symbol: Self::Symbol, name: &str) -> Option<Value> {
        match (symbol, name) {
            (CONTROLLER, "Name") => Some(Value::str("ReportsController")),
            (ACTION, "Name") => Some(Value::str("GetReport")),
            (ROUTE_ATTR, "Name") => Some(Value::str("Route")),
            (ROUTE_ATTR, "Argument0") => Some(Value::str("[controller]/reports")),
            (HTTP_GET_ATTR, "Name") => Some(Value::str("HttpGet")),
            _ => None,
        }
    }
    fn base_type_nodes_of(&self, _node: Self::Node) -> Vec<Self::Node> {
        Vec::new()
    }
    fn containing_type_of(&self, symbol: Self::Symbol) -> Option<Self::Symbol> {
        (symbol == ACTION).then_some(CONTROLLER)
    }
    fn documentation_id(&self, symbol: Self::Symbol) -> Option<String> {
        match symbol {
            CONTROLLER => Some("T:ReportsController".to_string()),
            ACTION => Some("M:ReportsController.GetReport".to_string()),
            _ => None,
        }
    }
    fn display_string(&self, symbol: Self::Symbol) -> String {
        match symbol {
            CONTROLLER => "ReportsController".to_string(),
            ACTION => "ReportsController.GetReport".to_string(),
            _ => String::new(),
        }
    }
}

impl Compilation for FakeCompilation {
    fn syntax_trees(&self) -> Vec<Self::Node> {
        vec![ROOT]
    }
    fn named_types(&self) -> Vec<Self::Symbol> {
        vec![CONTROLLER]
    }
}

struct FakeScheme;
impl KindScheme for FakeScheme {
    fn kind_matches_alias(&self, kind: &str, alias: KindAlias) -> bool {
        match alias {
            KindAlias::Class => kind == "ClassDeclaration",
            KindAlias::Method => kind == "MethodDeclaration",
            _ => false,
        }
    }
    fn kinds_for_alias(&self, alias: KindAlias) -> Vec<String> {
        match alias {
            KindAlias::Class => vec!["ClassDeclaration".to_string()],
            KindAlias::Method => vec!["MethodDeclaration".to_string()],
            _ => Vec::new(),
        }
    }
}

#[test]
fn builds_controller_and_action_nodes_with_canonicalized_routes() {
    let compilation = FakeCompilation;
    let scheme = FakeScheme;
    let graph = flowql_flow::build(
        &compilation,
        &scheme,
        QueryContext::default(),
        Some("Reports"),
        &CancellationToken::new(),
    );

    let controller = graph.node(&flowql_core::NodeId::from("T:ReportsController".to_string())).unwrap();
    assert_eq!(controller.kind, "endpoint.controller");
    assert_eq!(controller.properties.get("route"), Some(&Value::str("/Reports/reports")));

    let action = graph.node(&flowql_core::NodeId::from("M:ReportsController.GetReport".to_string())).unwrap();
    assert_eq!(action.kind, "endpoint.controller_action");
    assert_eq!(action.properties.get("http_method"), Some(&Value::str("GET")));
    assert_eq!(action.properties.get("full_route"), Some(&Value::str("/Reports/reports")));
    assert_eq!(action.properties.get("controller_id"), Some(&Value::str("T:ReportsController")));
}

#[test]
fn cancellation_produces_an_empty_graph() {
    let compilation = FakeCompilation;
    let scheme = FakeScheme;
    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let graph = flowql_flow::build(&compilation, &scheme, QueryContext::default(), None, &cancellation);
    assert!(graph.nodes.is_empty());
}

/// `ReportService` (class, node 1 / symbol 1) with one method `GetReport`
/// (node 2 / symbol 2) whose return type is `Widget` (symbol 50). The
/// method also references a namespace (symbol 99) and an external,
/// out-of-source symbol (symbol 61) — both of which Phase B must drop.
struct PropagationCompilation;

const P_ROOT: usize = 0;
const P_CLASS: usize = 1;
const P_METHOD: usize = 2;
const P_INVOKE_NAMESPACE: usize = 3;
const P_INVOKE_EXTERNAL: usize = 4;
const P_WIDGET: usize = 50;
const P_NAMESPACE: usize = 99;
const P_EXTERNAL: usize = 61;

impl TreeProvider for PropagationCompilation {
    type Node = usize;
    type Symbol = usize;

    fn kind_of(&self, node: Self::Node) -> &str {
        match node {
            P_CLASS => "ClassDeclaration",
            P_METHOD => "MethodDeclaration",
            P_INVOKE_NAMESPACE | P_INVOKE_EXTERNAL => "InvocationExpression",
            _ => "CompilationUnit",
        }
    }
    fn children_of(&self, node: Self::Node) -> Vec<Self::Node> {
        match node {
            P_ROOT => vec![P_CLASS],
            P_CLASS => vec![P_METHOD],
            P_METHOD => vec![P_INVOKE_NAMESPACE, P_INVOKE_EXTERNAL],
            _ => Vec::new(),
        }
    }
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node> {
        match node {
            P_CLASS => Some(P_ROOT),
            P_METHOD => Some(P_CLASS),
            P_INVOKE_NAMESPACE | P_INVOKE_EXTERNAL => Some(P_METHOD),
            _ => None,
        }
    }
    fn identifier_text_of(&self, node: Self::Node) -> Option<String> {
        self.symbol_property(node, "Name").and_then(|v| v.as_match_string())
    }
    fn span_of(&self, _node: Self::Node) -> Option<Span> {
        Some(Span { start_offset: 0, end_offset: 1, start_line: 1, end_line: 1 })
    }
    fn file_path_of(&self, _node: Self::Node) -> Option<String> {
        Some("Reports.cs".to_string())
    }
    fn declared_symbol(&self, node: Self::Node) -> Option<Self::Symbol> {
        matches!(node, P_CLASS | P_METHOD).then_some(node)
    }
    fn bound_symbol(&self, node: Self::Node) -> Option<Self::Symbol> {
        match node {
            P_CLASS => Some(P_CLASS),
            P_METHOD => Some(P_METHOD),
            P_INVOKE_NAMESPACE => Some(P_NAMESPACE),
            P_INVOKE_EXTERNAL => Some(P_EXTERNAL),
            _ => None,
        }
    }
    fn type_info(&self, _node: Self::Node) -> Option<Self::Symbol> {
        None
    }
    fn constant_value(&self, _node: Self::Node) -> Option<Value> {
        None
    }
    fn attributes_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }
    fn base_types_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }
    fn interfaces_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }
    fn members_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }
    fn node_property(&self, node: Self::Node, name: &str) -> Option<Value> {
        self.symbol_property(node, name)
    }
    fn symbol_property(&self, symbol: Self::Symbol, name: &str) -> Option<Value> {
        match (symbol, name) {
            (P_CLASS, "Name") => Some(Value::str("ReportService")),
            (P_METHOD, "Name") => Some(Value::str("GetReport")),
            _ => None,
        }
    }
    fn base_type_nodes_of(&self, _node: Self::Node) -> Vec<Self::Node> {
        Vec::new()
    }
    fn containing_type_of(&self, symbol: Self::Symbol) -> Option<Self::Symbol> {
        (symbol == P_METHOD).then_some(P_CLASS)
    }
    fn documentation_id(&self, symbol: Self::Symbol) -> Option<String> {
        match symbol {
            P_CLASS => Some("T:ReportService".to_string()),
            P_METHOD => Some("M:ReportService.GetReport".to_string()),
            P_WIDGET => Some("T:Widget".to_string()),
            _ => None,
        }
    }
    fn display_string(&self, symbol: Self::Symbol) -> String {
        match symbol {
            P_CLASS => "ReportService".to_string(),
            P_METHOD => "ReportService.GetReport".to_string(),
            P_WIDGET => "Widget".to_string(),
            _ => String::new(),
        }
    }
    fn symbol_kind(&self, symbol: Self::Symbol) -> flowql_core::SymbolKind {
        match symbol {
            P_CLASS | P_WIDGET => flowql_core::SymbolKind::Type,
            P_METHOD => flowql_core::SymbolKind::Method,
            _ => flowql_core::SymbolKind::Other,
        }
    }
    fn return_type_of(&self, symbol: Self::Symbol) -> Option<Self::Symbol> {
        (symbol == P_METHOD).then_some(P_WIDGET)
    }
    fn is_namespace(&self, symbol: Self::Symbol) -> bool {
        symbol == P_NAMESPACE
    }
    fn has_source_location(&self, symbol: Self::Symbol) -> bool {
        symbol != P_EXTERNAL
    }
}

impl Compilation for PropagationCompilation {
    fn syntax_trees(&self) -> Vec<Self::Node> {
        vec![P_ROOT]
    }
    fn named_types(&self) -> Vec<Self::Symbol> {
        vec![P_CLASS, P_WIDGET]
    }
}

#[test]
fn phase_b_propagates_return_type_and_drops_namespace_and_external_candidates() {
    let compilation = PropagationCompilation;
    let scheme = FakeScheme;
    let graph =
        flowql_flow::build(&compilation, &scheme, QueryContext::default(), Some("Reports"), &CancellationToken::new());

    assert!(graph.node(&flowql_core::NodeId::from("T:ReportService".to_string())).is_some());
    assert!(graph.node(&flowql_core::NodeId::from("M:ReportService.GetReport".to_string())).is_some());
    assert!(graph.node(&flowql_core::NodeId::from("T:Widget".to_string())).is_some());

    assert_eq!(graph.nodes.len(), 3, "namespace and external candidates must not become nodes");
}
