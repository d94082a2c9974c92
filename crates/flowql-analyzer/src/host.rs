// SPDX-License-Identifier: MIT OR Apache-2.0

use flowql_core::Compilation;
use flowql_matcher::{query_first, Dispatcher, Engine, KindScheme, QueryContext};

use crate::config::{AnalyzerConfig, RuleAction};
use crate::diagnostic::Diagnostic;

/// Runs every rule in `config` over `compilation` (§4.9). Each rule's
/// `selector` becomes one entry in a batched `Dispatcher`, which already
/// implements the per-node (top-level kind known) vs. per-tree (global)
/// split the host needs — a rule whose anchor fixes a kind is only ever
/// tried against nodes of that kind, everything else is tried everywhere.
pub fn analyze<C, S>(compilation: &C, scheme: &S, config: &AnalyzerConfig, qc: QueryContext<'_, C>) -> Vec<Diagnostic>
where
    C: Compilation,
    S: KindScheme,
{
    let engine = Engine::new(compilation, scheme);
    let lists = config.rules.iter().map(|r| r.selector.clone()).collect();
    let dispatcher = Dispatcher::new(&engine, lists);

    let mut diagnostics = Vec::new();
    for tree_root in compilation.syntax_trees() {
        dispatcher.run(tree_root, qc, |rule_idx, m| {
            let rule = &config.rules[rule_idx];
            let fires = match &rule.action {
                RuleAction::ReportMatch => true,
                RuleAction::Static(sub_selector) => query_first(&engine, m.node, sub_selector, qc).is_none(),
                RuleAction::Templated(template) => {
                    let Some(identifier) = compilation.identifier_text_of(m.node) else { return };
                    let substituted = template.replace("{Name}", &identifier);
                    match crate::cache::compile_substituted(&substituted) {
                        Ok(sub_selector) => query_first(&engine, m.node, &sub_selector, qc).is_none(),
                        Err(err) => {
                            log::warn!("analyzer rule {rule_idx}: substituted selector {substituted:?} failed to parse: {err}");
                            false
                        }
                    }
                }
            };
            if fires {
                diagnostics.push(Diagnostic {
                    rule_index: rule_idx,
                    message: rule.message.clone(),
                    severity: rule.severity,
                    file_path: compilation.file_path_of(m.node),
                    span: compilation.span_of(m.node),
                });
            }
        });
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use flowql_core::{Span, TreeProvider, Value};
    use flowql_selectors::KindAlias;

    use super::*;
    use crate::severity::Severity;

    struct FakeCompilation;

    impl TreeProvider for FakeCompilation {
        type Node = usize;
        type Symbol = usize;

        fn kind_of(&self, node: Self::Node) -> &str {
            match node {
                0 => "CompilationUnit",
                1 => "ClassDeclaration",
                _ => "MethodDeclaration",
            }
        }
        fn children_of(&self, node: Self::Node) -> Vec<Self::Node> {
            match node {
                0 => vec![1],
                _ => Vec::new(),
            }
        }
        fn parent_of(&self, node: Self::Node) -> Option<Self::Node> {
            (node == 1).then_some(0)
        }
        fn identifier_text_of(&self, node: Self::Node) -> Option<String> {
            (node == 1).then(|| "WidgetController".to_string())
        }
        fn span_of(&self, _node: Self::Node) -> Option<Span> {
            None
        }
        fn file_path_of(&self, _node: Self::Node) -> Option<String> {
            Some("Widget.cs".to_string())
        }
        fn declared_symbol(&self, node: Self::Node) -> Option<Self::Symbol> {
            (node == 1).then_some(node)
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
            (node == 1 && name == "Name").then(|| Value::str("WidgetController"))
        }
        fn symbol_property(&self, symbol: Self::Symbol, name: &str) -> Option<Value> {
            self.node_property(symbol, name)
        }
        fn base_type_nodes_of(&self, _node: Self::Node) -> Vec<Self::Node> {
            Vec::new()
        }
        fn containing_type_of(&self, _symbol: Self::Symbol) -> Option<Self::Symbol> {
            None
        }
        fn documentation_id(&self, symbol: Self::Symbol) -> Option<String> {
            (symbol == 1).then(|| "T:WidgetController".to_string())
        }
        fn display_string(&self, _symbol: Self::Symbol) -> String {
            "WidgetController".to_string()
        }
    }

    impl Compilation for FakeCompilation {
        fn syntax_trees(&self) -> Vec<Self::Node> {
            vec![0]
        }
        fn named_types(&self) -> Vec<Self::Symbol> {
            vec![1]
        }
    }

    struct FakeScheme;
    impl KindScheme for FakeScheme {
        fn kind_matches_alias(&self, kind: &str, alias: KindAlias) -> bool {
            matches!((alias, kind), (KindAlias::Class, "ClassDeclaration") | (KindAlias::Method, "MethodDeclaration"))
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
    fn reports_rule_with_no_sub_rule_unconditionally() {
        let config = AnalyzerConfig::from_json(
            r#"{"rules": [{"selector": ":class[Name$='Controller']", "message": "no validator", "severity": "warning"}]}"#,
        )
        .unwrap();
        let diagnostics = analyze(&FakeCompilation, &FakeScheme, &config, QueryContext::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].message, "no validator");
    }

    #[test]
    fn static_sub_rule_reports_only_when_no_sub_match_found() {
        let config = AnalyzerConfig::from_json(
            r#"{"rules": [{"selector": ":class", "rule": ":method", "message": "needs a method", "severity": "error"}]}"#,
        )
        .unwrap();
        let diagnostics = analyze(&FakeCompilation, &FakeScheme, &config, QueryContext::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn templated_sub_rule_substitutes_matched_identifier() {
        let config = AnalyzerConfig::from_json(
            r#"{"rules": [{"selector": ":class", "rule": ":method[Name='{Name}']", "message": "x", "severity": "info"}]}"#,
        )
        .unwrap();
        let diagnostics = analyze(&FakeCompilation, &FakeScheme, &config, QueryContext::default());
        assert_eq!(diagnostics.len(), 1);
    }
}
