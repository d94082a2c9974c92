// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use flowql_core::TreeProvider;
use flowql_selectors::{
    Combinator, ComplexSelector, ComplexSelectorList, CompoundSelector, KindAlias, PseudoClass,
    SimpleSelector,
};

use crate::capture::CaptureState;
use crate::context::{MatchContext, QueryContext};
use crate::resolve::resolve_path;

/// Maps the selector language's abstract kind aliases (`:class`, `:method`,
/// ...) onto a concrete `TreeProvider`'s raw syntax-kind strings. A real
/// language binding implements this once; everything else in this crate is
/// generic over it.
pub trait KindScheme {
    fn kind_matches_alias(&self, kind: &str, alias: KindAlias) -> bool;

    /// Concrete kind strings an alias can ever denote, used to compute
    /// top-level kind hints (§4.3, §4.4). An empty result means "unknown",
    /// which the dispatcher treats as a global (unhinted) selector.
    fn kinds_for_alias(&self, alias: KindAlias) -> Vec<String>;
}

/// Bundles a tree provider with the kind scheme needed to interpret kind
/// aliases and type selectors against it.
pub struct Engine<'p, P: TreeProvider, S: KindScheme> {
    pub provider: &'p P,
    pub scheme: &'p S,
}

impl<'p, P: TreeProvider, S: KindScheme> Engine<'p, P, S> {
    pub fn new(provider: &'p P, scheme: &'p S) -> Self {
        Self { provider, scheme }
    }
}

/// One match produced by a query (§4.3 `Match{node, context}`).
pub struct Match<P: TreeProvider> {
    pub node: P::Node,
    pub symbol: Option<P::Symbol>,
    pub captures: CaptureState,
}

/// `query_all` (§4.3): nodes matching `selector`, pre-order, source order.
pub fn query_all<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    start: P::Node,
    selector: &ComplexSelectorList,
    qc: QueryContext<'_, P>,
) -> Vec<P::Node> {
    query_matches(engine, start, selector, qc).into_iter().map(|m| m.node).collect()
}

/// `query_matches` (§4.3): full match records, pre-order, source order.
pub fn query_matches<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    start: P::Node,
    selector: &ComplexSelectorList,
    qc: QueryContext<'_, P>,
) -> Vec<Match<P>> {
    let mut out = Vec::new();
    visit(engine, start, start, qc, selector, &mut out);
    out
}

/// `query_first` (§4.3): the first match in traversal order, or none.
pub fn query_first<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    start: P::Node,
    selector: &ComplexSelectorList,
    qc: QueryContext<'_, P>,
) -> Option<Match<P>> {
    query_matches(engine, start, selector, qc).into_iter().next()
}

fn visit<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    node: P::Node,
    scope: P::Node,
    qc: QueryContext<'_, P>,
    selector: &ComplexSelectorList,
    out: &mut Vec<Match<P>>,
) {
    let ctx = MatchContext::root_query(engine.provider, node, scope, qc);
    if let Some(matched) = try_match_list(engine, &ctx, selector) {
        out.push(Match { node, symbol: matched.symbol(), captures: matched.captures.clone() });
    }
    for child in engine.provider.children_of(node) {
        visit(engine, child, scope, qc, selector, out);
    }
}

/// Tries each alternative in a `ComplexSelectorList` (first match wins, as
/// for CSS `:is`/selector lists) and returns the resulting context.
pub fn try_match_list<'a, P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    ctx: &MatchContext<'a, P>,
    list: &ComplexSelectorList,
) -> Option<MatchContext<'a, P>> {
    list.items.iter().find_map(|item| match_complex(engine, ctx.clone(), item))
}

fn anchor_compound(complex: &ComplexSelector) -> &CompoundSelector {
    complex.rest.last().map_or(&complex.first, |(_, compound)| compound)
}

/// Top-level kind hints for one complex selector's anchor compound (§4.3).
/// `None` means "no constraint" (global selector).
pub fn anchor_kind_hints<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    complex: &ComplexSelector,
) -> Option<HashSet<String>> {
    for simple in &anchor_compound(complex).simples {
        match simple {
            SimpleSelector::Type(name) => return Some([name.clone()].into_iter().collect()),
            SimpleSelector::KindAlias(alias) => {
                return Some(engine.scheme.kinds_for_alias(*alias).into_iter().collect());
            }
            _ => {}
        }
    }
    None
}

fn match_complex<'a, P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    ctx: MatchContext<'a, P>,
    complex: &ComplexSelector,
) -> Option<MatchContext<'a, P>> {
    let sequence = as_sequence(complex);
    let combinators = combinators(complex);
    let anchor_idx = sequence.len() - 1;
    let after_anchor = match_compound(engine, ctx, sequence[anchor_idx])?;
    if satisfies_complex(engine, &after_anchor, &sequence, &combinators, anchor_idx) {
        Some(after_anchor)
    } else {
        None
    }
}

fn as_sequence(complex: &ComplexSelector) -> Vec<&CompoundSelector> {
    let mut seq = vec![&complex.first];
    seq.extend(complex.rest.iter().map(|(_, compound)| compound));
    seq
}

fn combinators(complex: &ComplexSelector) -> Vec<Combinator> {
    complex.rest.iter().map(|(c, _)| *c).collect()
}

/// Walks the combinator chain right-to-left from the already-matched
/// anchor compound at `sequence[idx]`, requiring each earlier compound to
/// match some ancestor/sibling per its combinator (§4.3).
/// index bookkeeping in `satisfies_chain` stays correct without threading a
/// borrowed `ComplexSelector` through recursive calls.
fn satisfies_complex<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    ctx: &MatchContext<'_, P>,
    sequence: &[&CompoundSelector],
    combinators: &[Combinator],
    idx: usize,
) -> bool {
    if idx == 0 {
        return true;
    }
    let combinator = combinators[idx - 1];
    let prev_compound = sequence[idx - 1];
    match combinator {
        Combinator::Descendant => {
            let mut cursor = engine.provider.parent_of(ctx.node);
            while let Some(parent) = cursor {
                let candidate = ctx.at_node(parent);
                if let Some(matched) = match_compound(engine, candidate, prev_compound) {
                    if satisfies_complex(engine, &matched, sequence, combinators, idx - 1) {
                        return true;
                    }
                }
                cursor = engine.provider.parent_of(parent);
            }
            false
        }
        Combinator::Child => {
            let Some(parent) = engine.provider.parent_of(ctx.node) else { return false };
            match_compound(engine, ctx.at_node(parent), prev_compound)
                .is_some_and(|matched| satisfies_complex(engine, &matched, sequence, combinators, idx - 1))
        }
        Combinator::NextSibling => {
            let Some(prev) = immediate_preceding_sibling(engine.provider, ctx.node) else {
                return false;
            };
            match_compound(engine, ctx.at_node(prev), prev_compound)
                .is_some_and(|matched| satisfies_complex(engine, &matched, sequence, combinators, idx - 1))
        }
        Combinator::SubsequentSibling => {
            for sibling in preceding_siblings(engine.provider, ctx.node) {
                let candidate = ctx.at_node(sibling);
                if let Some(matched) = match_compound(engine, candidate, prev_compound) {
                    if satisfies_complex(engine, &matched, sequence, combinators, idx - 1) {
                        return true;
                    }
                }
            }
            false
        }
    }
}

fn match_compound<'a, P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    ctx: MatchContext<'a, P>,
    compound: &CompoundSelector,
) -> Option<MatchContext<'a, P>> {
    let mut current = ctx;
    for simple in &compound.simples {
        current = match_simple(engine, current, simple)?;
    }
    Some(current)
}

fn match_simple<'a, P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    ctx: MatchContext<'a, P>,
    simple: &SimpleSelector,
) -> Option<MatchContext<'a, P>> {
    match simple {
        SimpleSelector::Type(name) => (engine.provider.kind_of(ctx.node) == name).then_some(ctx),
        SimpleSelector::UniversalType => Some(ctx),
        SimpleSelector::Id(name) => {
            (engine.provider.node_property(ctx.node, "Id").and_then(|v| v.as_match_string())
                .as_deref()
                == Some(name.as_str()))
            .then_some(ctx)
        }
        SimpleSelector::Class(name) => engine
            .provider
            .node_property(ctx.node, "Class")
            .and_then(|v| v.as_match_string())
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == name))
            .then_some(ctx),
        SimpleSelector::PropertyName(path) => resolve_path(&ctx, path).map(|_| ctx),
        SimpleSelector::PropertyStringMatch { path, op, literal, case_insensitive, negate } => {
            let value = resolve_path(&ctx, path)?.as_match_string()?;
            let matched = string_op_matches(*op, &value, literal, *case_insensitive);
            (matched != *negate).then_some(ctx)
        }
        SimpleSelector::PropertyNumericMatch { path, op, value } => {
            let resolved = resolve_path(&ctx, path)?.as_match_integer()?;
            numeric_op_matches(*op, resolved, *value).then_some(ctx)
        }
        SimpleSelector::PseudoClass(pseudo) => match_pseudo(engine, ctx, pseudo),
        SimpleSelector::KindAlias(alias) => {
            engine.scheme.kind_matches_alias(engine.provider.kind_of(ctx.node), *alias).then_some(ctx)
        }
    }
}

fn string_op_matches(
    op: flowql_selectors::StringOp,
    value: &str,
    literal: &str,
    case_insensitive: bool,
) -> bool {
    use flowql_selectors::StringOp as Op;
    let (value, literal) = if case_insensitive {
        (value.to_lowercase(), literal.to_lowercase())
    } else {
        (value.to_string(), literal.to_string())
    };
    match op {
        Op::Equals => value == literal,
        Op::Contains => value.contains(&literal),
        Op::StartsWith => value.starts_with(&literal),
        Op::EndsWith => value.ends_with(&literal),
        Op::Includes => value.split_whitespace().any(|tok| tok == literal),
        Op::DashMatch => value == literal || value.starts_with(&format!("{literal}-")),
    }
}

fn numeric_op_matches(op: flowql_selectors::NumericOp, value: i64, expected: i64) -> bool {
    use flowql_selectors::NumericOp as Op;
    match op {
        Op::Equals => value == expected,
        Op::Less => value < expected,
        Op::LessEq => value <= expected,
        Op::Greater => value > expected,
        Op::GreaterEq => value >= expected,
    }
}

fn siblings_of<P: TreeProvider>(provider: &P, node: P::Node) -> Vec<P::Node> {
    match provider.parent_of(node) {
        Some(parent) => provider.children_of(parent),
        None => vec![node],
    }
}

fn immediate_preceding_sibling<P: TreeProvider>(provider: &P, node: P::Node) -> Option<P::Node> {
    let siblings = siblings_of(provider, node);
    let idx = siblings.iter().position(|n| *n == node)?;
    (idx > 0).then(|| siblings[idx - 1])
}

fn preceding_siblings<P: TreeProvider>(provider: &P, node: P::Node) -> Vec<P::Node> {
    let siblings = siblings_of(provider, node);
    match siblings.iter().position(|n| *n == node) {
        Some(idx) => siblings[..idx].to_vec(),
        None => Vec::new(),
    }
}

fn position_among<T: PartialEq + Copy>(siblings: &[T], node: T) -> Option<i64> {
    siblings.iter().position(|n| *n == node).map(|idx| idx as i64 + 1)
}

fn match_pseudo<'a, P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    ctx: MatchContext<'a, P>,
    pseudo: &PseudoClass,
) -> Option<MatchContext<'a, P>> {
    match pseudo {
        PseudoClass::Not(inner) => {
            match_compound(engine, ctx.clone(), inner).is_none().then_some(ctx)
        }
        PseudoClass::Is(list) | PseudoClass::Where(list) => {
            list.items.iter().any(|item| match_complex(engine, ctx.clone(), item).is_some()).then_some(ctx)
        }
        PseudoClass::Has(list) => has_descendant_match(engine, &ctx, list).then_some(ctx),
        PseudoClass::Implements(list) => engine
            .provider
            .base_type_nodes_of(ctx.node)
            .into_iter()
            .any(|base_node| {
                let base_ctx = ctx.at_node(base_node);
                list.items.iter().any(|item| match_complex(engine, base_ctx.clone(), item).is_some())
            })
            .then_some(ctx),
        PseudoClass::NthChild(nth) => {
            let siblings = siblings_of(engine.provider, ctx.node);
            let pos = position_among(&siblings, ctx.node)?;
            nth.matches(pos).then_some(ctx)
        }
        PseudoClass::NthLastChild(nth) => {
            let siblings = siblings_of(engine.provider, ctx.node);
            let pos = position_among(&siblings, ctx.node)?;
            nth.matches(siblings.len() as i64 - pos + 1).then_some(ctx)
        }
        PseudoClass::NthOfType(nth) => {
            let kind = engine.provider.kind_of(ctx.node).to_string();
            let siblings = same_kind_siblings(engine.provider, ctx.node, &kind);
            let pos = position_among(&siblings, ctx.node)?;
            nth.matches(pos).then_some(ctx)
        }
        PseudoClass::NthLastOfType(nth) => {
            let kind = engine.provider.kind_of(ctx.node).to_string();
            let siblings = same_kind_siblings(engine.provider, ctx.node, &kind);
            let pos = position_among(&siblings, ctx.node)?;
            nth.matches(siblings.len() as i64 - pos + 1).then_some(ctx)
        }
        PseudoClass::FirstChild => {
            (position_among(&siblings_of(engine.provider, ctx.node), ctx.node)? == 1).then_some(ctx)
        }
        PseudoClass::LastChild => {
            let siblings = siblings_of(engine.provider, ctx.node);
            (position_among(&siblings, ctx.node)? == siblings.len() as i64).then_some(ctx)
        }
        PseudoClass::OnlyChild => (siblings_of(engine.provider, ctx.node).len() == 1).then_some(ctx),
        PseudoClass::OnlyOfType => {
            let kind = engine.provider.kind_of(ctx.node).to_string();
            (same_kind_siblings(engine.provider, ctx.node, &kind).len() == 1).then_some(ctx)
        }
        PseudoClass::Empty => engine.provider.children_of(ctx.node).is_empty().then_some(ctx),
        PseudoClass::Scope => (ctx.node == ctx.scope).then_some(ctx),
        PseudoClass::Root => (ctx.node == ctx.root).then_some(ctx),
        PseudoClass::Capture(alias, path) => {
            let value = match path {
                Some(path) => resolve_path(&ctx, path).unwrap_or(flowql_core::Value::None),
                None => ctx.symbol().map_or_else(
                    || flowql_core::Value::Str(engine.provider.kind_of(ctx.node).to_string()),
                    |symbol| flowql_core::Value::Str(engine.provider.display_string(symbol)),
                ),
            };
            Some(ctx.with_capture(alias.clone(), value))
        }
    }
}

fn same_kind_siblings<P: TreeProvider>(provider: &P, node: P::Node, kind: &str) -> Vec<P::Node> {
    siblings_of(provider, node).into_iter().filter(|n| provider.kind_of(*n) == kind).collect()
}

fn has_descendant_match<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    ctx: &MatchContext<'_, P>,
    list: &ComplexSelectorList,
) -> bool {
    fn walk<P: TreeProvider, S: KindScheme>(
        engine: &Engine<'_, P, S>,
        ctx: &MatchContext<'_, P>,
        list: &ComplexSelectorList,
        node: P::Node,
    ) -> bool {
        for child in engine.provider.children_of(node) {
            let candidate = ctx.at_node(child);
            if try_match_list(engine, &candidate, list).is_some() {
                return true;
            }
            if walk(engine, ctx, list, child) {
                return true;
            }
        }
        false
    }
    walk(engine, ctx, list, ctx.node)
}
