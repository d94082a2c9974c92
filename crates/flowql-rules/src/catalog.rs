// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use flowql_core::{TreeProvider, Value};
use flowql_selectors::ComplexSelectorList;

use crate::extractors::{controller_action_extractor, controller_extractor, http_call_extractor};

/// Inputs available to a rule's property extractor: the matched node, its
/// resolved symbol (per the rule's `use_symbol_identity`, but extractors may
/// still read `symbol` even when identity is anonymous), and the captures
/// accumulated while matching.
pub struct ExtractorContext<'a, P: TreeProvider> {
    pub provider: &'a P,
    pub node: P::Node,
    pub symbol: Option<P::Symbol>,
}

pub type Extractor<P> = fn(&ExtractorContext<'_, P>) -> BTreeMap<String, Value>;

/// One entry of the rule catalog (§4.5): a selector, the flow-graph node
/// type/tags it contributes when it matches, whether the matched node's
/// symbol should be used as graph-node identity, and an optional property
/// extractor.
pub struct Rule<P: TreeProvider> {
    pub node_type: &'static str,
    pub selector: ComplexSelectorList,
    pub tags: &'static [&'static str],
    pub use_symbol_identity: bool,
    pub extractor: Option<Extractor<P>>,
}

fn selector_of(text: &str) -> ComplexSelectorList {
    flowql_selectors::parse(text).unwrap_or_else(|err| panic!("builtin rule selector {text:?} failed to parse: {err:?}"))
}

fn rule<P: TreeProvider>(node_type: &'static str, text: &str, tags: &'static [&'static str]) -> Rule<P> {
    Rule { node_type, selector: selector_of(text), tags, use_symbol_identity: true, extractor: None }
}

fn rule_with<P: TreeProvider>(
    node_type: &'static str,
    text: &str,
    tags: &'static [&'static str],
    use_symbol_identity: bool,
    extractor: Extractor<P>,
) -> Rule<P> {
    Rule { node_type, selector: selector_of(text), tags, use_symbol_identity, extractor: Some(extractor) }
}

/// The fixed ordered rule table (§4.5). Order is meaningful: when several
/// rules match the same node, extracted properties merge first-non-empty-
/// wins per key, in catalog order.
pub fn catalog<P: TreeProvider>() -> Vec<Rule<P>> {
    vec![
        rule_with(
            "endpoint.controller",
            ":class[Name$='Controller']",
            &["endpoint", "controller"],
            true,
            controller_extractor,
        ),
        rule_with(
            "endpoint.controller_action",
            ":class[Name$='Controller'] > :method:is(\
                [Name^='Get'], [Name^='Post'], [Name^='Put'], [Name^='Delete'], [Name^='Patch'], [Name^='Head'])",
            &["endpoint", "action"],
            true,
            controller_action_extractor,
        ),
        rule("app.service", ":class[Name$='Service']", &["service"]),
        rule("data.repository", ":class[Name$='Repository']", &["repository"]),
        rule("data.dto", ":class:is([Name$='Dto'], [Name$='Request'], [Name$='Response'])", &["dto"]),
        rule("data.entity", ":class[Name$='Entity']", &["entity"]),
        rule("data.db_context", ":class[Name$='DbContext']", &["db-context"]),
        rule("validation.validator", ":class[Name$='Validator']", &["validator"]),
        rule("cqrs.handler", ":class[Name$='Handler']", &["cqrs", "handler"]),
        rule("cqrs.pipeline", ":class[Name$='Behavior']", &["cqrs", "pipeline"]),
        rule("cqrs.request", ":class:is([Name$='Command'], [Name$='Query'])", &["cqrs", "request"]),
        rule("cqrs.notification", ":class[Name$='Event']", &["cqrs", "notification"]),
        rule("messaging.publisher", ":class[Name$='Publisher']", &["publisher"]),
        rule(
            "app.background_service",
            ":class:is([Name$='BackgroundService'], [Name$='HostedService'])",
            &["background-service"],
        ),
        rule("config.options", ":class[Name$='Options']", &["options"]),
        rule("data.cache", ":class[Name$='Cache']", &["cache"]),
        rule("infra.http_client", ":class[Name*='HttpClient']", &["http-client"]),
        rule_with("infra.http_call", "InvocationExpression", &["http-call"], false, http_call_extractor),
        rule("security.guard", ":class:is([Name$='Guard'], [Name$='Policy'])", &["guard"]),
        rule("data.mapper", ":class:is([Name$='Mapper'], [Name$='Profile'])", &["mapper"]),
        rule(
            "security.authorization",
            ":method[Name='Authorize'], :class[Name$='AuthorizationHandler']",
            &["authorization"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use flowql_core::Span;

    use super::*;

    struct NullTree;
    impl TreeProvider for NullTree {
        type Node = ();
        type Symbol = ();
        fn kind_of(&self, _node: Self::Node) -> &str {
            ""
        }
        fn children_of(&self, _node: Self::Node) -> Vec<Self::Node> {
            Vec::new()
        }
        fn parent_of(&self, _node: Self::Node) -> Option<Self::Node> {
            None
        }
        fn identifier_text_of(&self, _node: Self::Node) -> Option<String> {
            None
        }
        fn span_of(&self, _node: Self::Node) -> Option<Span> {
            None
        }
        fn file_path_of(&self, _node: Self::Node) -> Option<String> {
            None
        }
        fn declared_symbol(&self, _node: Self::Node) -> Option<Self::Symbol> {
            None
        }
        fn bound_symbol(&self, _node: Self::Node) -> Option<Self::Symbol> {
            None
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
        fn node_property(&self, _node: Self::Node, _name: &str) -> Option<Value> {
            None
        }
        fn symbol_property(&self, _symbol: Self::Symbol, _name: &str) -> Option<Value> {
            None
        }
        fn base_type_nodes_of(&self, _node: Self::Node) -> Vec<Self::Node> {
            Vec::new()
        }
        fn containing_type_of(&self, _symbol: Self::Symbol) -> Option<Self::Symbol> {
            None
        }
        fn documentation_id(&self, _symbol: Self::Symbol) -> Option<String> {
            None
        }
        fn display_string(&self, _symbol: Self::Symbol) -> String {
            String::new()
        }
    }

    #[test]
    fn catalog_is_non_empty_and_every_selector_parses() {
        let rules = catalog::<NullTree>();
        assert!(rules.len() > 15);
        assert!(rules.iter().any(|r| r.node_type == "endpoint.controller"));
        assert!(rules.iter().any(|r| r.node_type == "infra.http_call" && !r.use_symbol_identity));
    }
}
