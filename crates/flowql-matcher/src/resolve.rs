// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use flowql_core::{TreeProvider, Value};
use flowql_selectors::PropertyPath;

use crate::context::MatchContext;

/// Evaluates a dotted property path against a match context (§4.2).
/// Total: an unresolvable path returns `None`, which callers treat as
/// `PropertyNotResolvable` — never a panic or propagated error.
pub fn resolve_path<P: TreeProvider>(ctx: &MatchContext<'_, P>, path: &PropertyPath) -> Option<Value> {
    if path.metadata {
        return resolve_metadata_path(ctx, &path.segments);
    }
    let (head, rest) = path.segments.split_first()?;
    match head.name.as_str() {
        "Symbol" => resolve_symbol_root(ctx, ctx.symbol(), rest),
        "Type" => resolve_symbol_root(ctx, type_root(ctx), rest),
        "ConvertedType" => resolve_symbol_root(ctx, ctx.provider.converted_type_info(ctx.node), rest),
        "DeclaredSymbol" => resolve_symbol_root(ctx, ctx.provider.declared_symbol(ctx.node), rest),
        "ConstantValue" => rest.is_empty().then(|| ctx.provider.constant_value(ctx.node)).flatten(),
        "SemanticModel" | "Compilation" => None,
        "Context" => resolve_context_path(ctx, rest),
        "Scope" => resolve_node_root(ctx, ctx.scope, rest),
        "Root" => resolve_node_root(ctx, ctx.root, rest),
        "Node" => resolve_node_root(ctx, ctx.node, rest),
        _ => resolve_node_root(ctx, ctx.node, &path.segments),
    }
}

/// The `Type` root's fallback chain (§4.2): static type, then converted
/// type, then the declared symbol's type-ish projection (a callable's
/// return type, a property/field/event's value type).
fn type_root<P: TreeProvider>(ctx: &MatchContext<'_, P>) -> Option<P::Symbol> {
    ctx.provider
        .type_info(ctx.node)
        .or_else(|| ctx.provider.converted_type_info(ctx.node))
        .or_else(|| ctx.provider.declared_symbol(ctx.node).and_then(|d| ctx.provider.type_ish_projection(d)))
}

/// Chains a symbol through every segment of `rest` (§4.2): every segment but
/// the last walks the symbol's member surface via `symbol_member` so a path
/// like `Type.ReturnType.Name` resolves at arbitrary depth; the last segment
/// either special-cases `DisplayString` or falls through to `symbol_property`.
fn resolve_symbol_root<P: TreeProvider>(
    ctx: &MatchContext<'_, P>,
    symbol: Option<P::Symbol>,
    rest: &[flowql_selectors::PathSegment],
) -> Option<Value> {
    let mut current = symbol?;
    let Some((last, init)) = rest.split_last() else {
        return Some(Value::Str(ctx.provider.display_string(current)));
    };
    for segment in init {
        current = ctx.provider.symbol_member(current, &segment.name)?;
    }
    if last.name.eq_ignore_ascii_case("DisplayString") {
        return Some(Value::Str(ctx.provider.display_string(current)));
    }
    ctx.provider.symbol_property(current, &last.name)
}

/// Node-rooted paths (`Scope`/`Root`/`Node`/implicit) resolve their own
/// first segment directly against the node, then — for any further segments
/// — hand off to the symbol chain via the node's bound symbol (§4.2).
fn resolve_node_root<P: TreeProvider>(
    ctx: &MatchContext<'_, P>,
    node: P::Node,
    rest: &[flowql_selectors::PathSegment],
) -> Option<Value> {
    match rest {
        [] => ctx.provider.identifier_text_of(node).map(Value::Str),
        [only] => ctx.provider.node_property(node, &only.name),
        _ => resolve_symbol_root(ctx, ctx.provider.bound_symbol(node), rest),
    }
}

fn resolve_context_path<P: TreeProvider>(
    ctx: &MatchContext<'_, P>,
    rest: &[flowql_selectors::PathSegment],
) -> Option<Value> {
    if rest.len() != 1 {
        return None;
    }
    lookup_case_insensitive(ctx.metadata?, &rest[0].name)
}

fn resolve_metadata_path<P: TreeProvider>(
    ctx: &MatchContext<'_, P>,
    segments: &[flowql_selectors::PathSegment],
) -> Option<Value> {
    let name = segments.first()?;
    if segments.len() > 1 {
        return None;
    }
    ctx.captures
        .get(&name.name)
        .or_else(|| ctx.metadata.and_then(|m| lookup_case_insensitive(m, &name.name)))
}

fn lookup_case_insensitive(map: &HashMap<String, Value>, key: &str) -> Option<Value> {
    map.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v.clone())
}
