// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use flowql_core::{TreeProvider, Value};

use crate::catalog::ExtractorContext;
use crate::route::{canonicalize_route, compose_full_route, verb_from_attribute_name, verb_from_method_name};

fn attribute_name<P: TreeProvider>(provider: &P, attribute: P::Symbol) -> String {
    provider.symbol_property(attribute, "Name").and_then(|v| v.as_match_string()).unwrap_or_default()
}

fn attribute_argument<P: TreeProvider>(provider: &P, attribute: P::Symbol, index: usize) -> Option<Value> {
    provider.symbol_property(attribute, &format!("Argument{index}"))
}

fn find_attribute<P: TreeProvider>(
    provider: &P,
    symbol: P::Symbol,
    predicate: impl Fn(&str) -> bool,
) -> Option<P::Symbol> {
    provider.attributes_of(symbol).into_iter().find(|attr| predicate(&attribute_name(provider, *attr)))
}

fn symbol_name<P: TreeProvider>(provider: &P, symbol: P::Symbol) -> String {
    provider.symbol_property(symbol, "Name").and_then(|v| v.as_match_string()).unwrap_or_else(|| provider.display_string(symbol))
}

fn symbol_doc_id<P: TreeProvider>(provider: &P, symbol: P::Symbol) -> String {
    provider.documentation_id(symbol).unwrap_or_else(|| provider.display_string(symbol))
}

/// Climbs from `node` to the nearest ancestor (inclusive) that has a
/// declared symbol — the "enclosing declared symbol" of a call site (§4.5).
fn enclosing_declared_symbol<P: TreeProvider>(provider: &P, node: P::Node) -> Option<P::Symbol> {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if let Some(symbol) = provider.declared_symbol(current) {
            return Some(symbol);
        }
        cursor = provider.parent_of(current);
    }
    None
}

/// Finds the first string-constant argument under `node`, preferring one
/// that looks like a route (starts with `/`) — used to recover an HTTP
/// call's literal route for remote-edge matching (§4.7).
fn find_string_argument<P: TreeProvider>(provider: &P, node: P::Node) -> Option<String> {
    let mut fallback = None;
    let mut stack = provider.children_of(node);
    while let Some(child) = stack.pop() {
        if let Some(Value::Str(text)) = provider.constant_value(child) {
            if text.starts_with('/') {
                return Some(text);
            }
            fallback.get_or_insert(text);
        }
        stack.extend(provider.children_of(child));
    }
    fallback
}

/// Controller extractor (§4.5): class-level route attribute, canonicalized
/// route, and authorization policy.
pub fn controller_extractor<P: TreeProvider>(ctx: &ExtractorContext<'_, P>) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    let Some(symbol) = ctx.symbol else { return out };
    let class_name = symbol_name(ctx.provider, symbol);
    out.insert("controller_name".to_string(), Value::str(class_name.clone()));
    out.insert("controller_id".to_string(), Value::str(symbol_doc_id(ctx.provider, symbol)));
    out.insert("controller_type".to_string(), Value::str(class_name.clone()));

    if let Some(route_attr) = find_attribute(ctx.provider, symbol, |name| name.contains("Route") || name.starts_with("Http")) {
        let raw_route = attribute_argument(ctx.provider, route_attr, 0).and_then(|v| v.as_match_string()).unwrap_or_default();
        out.insert("route".to_string(), Value::str(canonicalize_route(&raw_route, &class_name)));
    }

    if let Some(auth_attr) = find_attribute(ctx.provider, symbol, |name| name.contains("Authorize")) {
        let policy = attribute_argument(ctx.provider, auth_attr, 0).and_then(|v| v.as_match_string());
        out.insert("authorization_policy".to_string(), policy.map_or(Value::Bool(true), Value::Str));
    }

    out
}

/// Controller-action extractor (§4.5): inherits controller context, derives
/// HTTP method/route/status code from attributes.
pub fn controller_action_extractor<P: TreeProvider>(ctx: &ExtractorContext<'_, P>) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    let Some(symbol) = ctx.symbol else { return out };
    let Some(controller) = ctx.provider.containing_type_of(symbol) else { return out };
    let controller_name = symbol_name(ctx.provider, controller);
    out.insert("controller_name".to_string(), Value::str(controller_name.clone()));
    out.insert("controller_id".to_string(), Value::str(symbol_doc_id(ctx.provider, controller)));

    let http_method = find_attribute(ctx.provider, symbol, |name| verb_from_attribute_name(name).is_some())
        .and_then(|attr| verb_from_attribute_name(&attribute_name(ctx.provider, attr)))
        .map(str::to_string)
        .or_else(|| {
            let accept_verbs = find_attribute(ctx.provider, symbol, |name| name == "AcceptVerbs")?;
            attribute_argument(ctx.provider, accept_verbs, 0).and_then(|v| v.as_match_string()).map(|s| s.to_uppercase())
        });
    if let Some(method) = &http_method {
        out.insert("http_method".to_string(), Value::str(method.clone()));
    }

    let method_route = find_attribute(ctx.provider, symbol, |name| verb_from_attribute_name(name).is_some() || name.contains("Route"))
        .and_then(|attr| attribute_argument(ctx.provider, attr, 0))
        .and_then(|v| v.as_match_string())
        .unwrap_or_default();
    let controller_route = find_attribute(ctx.provider, controller, |name| name.contains("Route") || name.starts_with("Http"))
        .and_then(|attr| attribute_argument(ctx.provider, attr, 0))
        .and_then(|v| v.as_match_string())
        .unwrap_or_default();

    let full_route = compose_full_route(&controller_route, &method_route, &controller_name);
    out.insert("route".to_string(), Value::str(method_route));
    out.insert("full_route".to_string(), Value::str(full_route));

    if let Some(status_attr) = find_attribute(ctx.provider, symbol, |name| name == "ProducesResponseType") {
        if let Some(code) = attribute_argument(ctx.provider, status_attr, 0).and_then(|v| v.as_match_integer()) {
            out.insert("status_code".to_string(), Value::Int(code));
        }
    }

    out
}

/// HTTP-call extractor (§4.5): only contributes properties when the invoked
/// method's containing type looks like an HTTP client.
pub fn http_call_extractor<P: TreeProvider>(ctx: &ExtractorContext<'_, P>) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    let Some(symbol) = ctx.symbol else { return out };
    let Some(containing) = ctx.provider.containing_type_of(symbol) else { return out };
    let client_type = symbol_name(ctx.provider, containing);
    if !client_type.contains("HttpClient") {
        return out;
    }
    out.insert("client_type".to_string(), Value::str(client_type));

    let method_name = symbol_name(ctx.provider, symbol);
    let verb = verb_from_method_name(&method_name).map(str::to_string).or_else(|| {
        method_name
            .starts_with("Send")
            .then(|| ctx.provider.symbol_property(symbol, "Argument0").and_then(|v| v.as_match_string()))
            .flatten()
            .map(|s| s.to_uppercase())
    });
    if let Some(verb) = verb {
        out.insert("verb".to_string(), Value::str(verb));
    }

    if let Some(route) = find_string_argument(ctx.provider, ctx.node) {
        out.insert("route".to_string(), Value::str(route));
    }

    if let Some(caller) = enclosing_declared_symbol(ctx.provider, ctx.node) {
        out.insert("caller_id".to_string(), Value::str(symbol_doc_id(ctx.provider, caller)));
        if let Some(caller_type) = ctx.provider.containing_type_of(caller) {
            out.insert("caller_type".to_string(), Value::str(symbol_name(ctx.provider, caller_type)));
        }
    }

    out
}
