// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet, VecDeque};

use flowql_core::{CancellationToken, Compilation, NodeId, SymbolKey, SymbolKind};
use flowql_graph::{Edge, Evidence, Graph};
use flowql_matcher::{Dispatcher, Engine, KindScheme, QueryContext};

use crate::index::{build_type_index, implements_transitively, symbol_key, TypeIndex};
use crate::node_builder::NodeBuilder;
use crate::reference::collect_referenced_symbols;

/// `build(compilation, queryContext?) → FlowGraph` (§4.6).
///
/// Runs the rule catalog over every syntax tree in `compilation` (Phase A),
/// then propagates referenced symbols into `flow` edges until the queue of
/// newly discovered nodes runs dry (Phase B), then emits a finalized,
/// deterministically ordered graph (Phase C).
pub fn build<C, S>(
    compilation: &C,
    scheme: &S,
    qc: QueryContext<'_, C>,
    default_project: Option<&str>,
    cancellation: &CancellationToken,
) -> Graph
where
    C: Compilation,
    S: KindScheme,
{
    let mut graph = Graph::new();
    if cancellation.is_cancelled() {
        return graph;
    }

    let type_index = build_type_index(compilation);
    let rules = flowql_rules::catalog::<C>();
    let engine = Engine::new(compilation, scheme);
    let lists = rules.iter().map(|r| r.selector.clone()).collect();
    let dispatcher = Dispatcher::new(&engine, lists);

    let mut registry: HashMap<NodeId, NodeBuilder<C>> = HashMap::new();

    for tree_root in compilation.syntax_trees() {
        if cancellation.is_cancelled() {
            return Graph::new();
        }
        dispatcher.run(tree_root, qc, |rule_idx, m| {
            let rule = &rules[rule_idx];
            let identity = if rule.use_symbol_identity { m.symbol } else { None };
            let id = node_id_for(compilation, identity, m.node);
            let builder = registry.entry(id.clone()).or_insert_with(|| NodeBuilder::new(id, identity));
            let ectx = flowql_rules::ExtractorContext { provider: compilation, node: m.node, symbol: m.symbol };
            let properties = rule.extractor.map_or_else(Default::default, |extract| extract(&ectx));
            builder.merge_rule(rule.node_type, rule.tags, properties);
            builder.record_snapshot(compilation, m.node);
        });
    }

    let mut queue: VecDeque<NodeId> = registry.keys().cloned().collect();
    let mut propagated: HashSet<NodeId> = HashSet::new();

    while let Some(id) = queue.pop_front() {
        if cancellation.is_cancelled() {
            return Graph::new();
        }
        if !propagated.insert(id.clone()) {
            continue;
        }
        let Some(snapshots) = registry.get(&id).map(|b| b.snapshots.clone()) else { continue };
        if snapshots.is_empty() {
            continue;
        }

        let mut referenced = Vec::new();
        for snapshot in &snapshots {
            referenced.extend(collect_referenced_symbols(compilation, *snapshot));
        }

        let candidates = expand_candidates(compilation, &type_index, referenced);

        let origin_file = snapshots.iter().find_map(|n| compilation.file_path_of(*n));
        let origin_span = snapshots.iter().find_map(|n| compilation.span_of(*n));

        let mut seen_targets: HashSet<SymbolKey> = HashSet::new();
        for candidate in candidates {
            if compilation.is_namespace(candidate) || !compilation.has_source_location(candidate) {
                continue;
            }
            let target_key = symbol_key(compilation, candidate);
            if !seen_targets.insert(target_key) {
                continue;
            }
            let target_id = node_id_for_symbol(compilation, candidate);
            if target_id == id {
                continue;
            }
            registry.entry(target_id.clone()).or_insert_with(|| {
                queue.push_back(target_id.clone());
                NodeBuilder::new(target_id.clone(), Some(candidate))
            });

            let mut edge = Edge::new(id.clone(), target_id, "flow", "flowql-flow");
            if let (Some(path), Some(span)) = (&origin_file, origin_span) {
                edge.evidence.push(Evidence { path: path.clone(), start_line: span.start_line, end_line: span.end_line });
            }
            graph.insert_edge(edge);
        }
    }

    for (_, builder) in registry {
        graph.upsert_node(builder.into_node(compilation, default_project));
    }

    graph.finalize();
    graph
}

fn node_id_for<C: Compilation>(compilation: &C, symbol: Option<C::Symbol>, node: C::Node) -> NodeId {
    match symbol {
        Some(symbol) => node_id_for_symbol(compilation, symbol),
        None => match (compilation.file_path_of(node), compilation.span_of(node)) {
            (Some(path), Some(span)) => NodeId::synthetic(&path, span.start_offset, span.end_offset),
            _ => NodeId::from_documentation_id(format!("{node:?}")),
        },
    }
}

fn node_id_for_symbol<C: Compilation>(compilation: &C, symbol: C::Symbol) -> NodeId {
    let doc_id = compilation.documentation_id(symbol).unwrap_or_else(|| compilation.display_string(symbol));
    NodeId::from_documentation_id(doc_id)
}

/// Expand-by-kind plus expand-origin-relations (§4.6 Phase B): a method
/// contributes its containing type, return type, parameter types, and
/// partial counterparts; a property/field/event contributes its containing
/// type and value type; a type contributes its base type, interfaces, and
/// type arguments. Anything else (`SymbolKind::Other`) falls back to the
/// containing-type/base-types/interfaces union, which is a no-op for symbol
/// kinds that answer all three as empty.
fn expand_candidates<C: Compilation>(
    compilation: &C,
    index: &TypeIndex<C>,
    referenced: Vec<C::Symbol>,
) -> Vec<C::Symbol> {
    let mut expanded = Vec::new();
    for symbol in referenced {
        expanded.push(symbol);
        match compilation.symbol_kind(symbol) {
            SymbolKind::Method => {
                expanded.extend(compilation.containing_type_of(symbol));
                expanded.extend(compilation.return_type_of(symbol));
                expanded.extend(compilation.parameter_types_of(symbol));
                expanded.extend(compilation.partial_counterparts_of(symbol));
            }
            SymbolKind::PropertyLike => {
                expanded.extend(compilation.containing_type_of(symbol));
                expanded.extend(compilation.value_type_of(symbol));
            }
            SymbolKind::Type => {
                expanded.extend(compilation.base_types_of(symbol));
                expanded.extend(compilation.interfaces_of(symbol));
                expanded.extend(compilation.type_arguments_of(symbol));
            }
            SymbolKind::Other => {
                expanded.extend(compilation.containing_type_of(symbol));
                expanded.extend(compilation.base_types_of(symbol));
                expanded.extend(compilation.interfaces_of(symbol));
            }
        }
    }

    let mut origin_relations = Vec::new();
    for symbol in &expanded {
        let key = symbol_key(compilation, *symbol);

        if let Some(derived) = index.derived_by_base.get(&key) {
            origin_relations.extend(derived.iter().filter_map(|k| index.symbols.get(k)).copied());
        }
        if let Some(implementers) = index.impls_by_interface.get(&key) {
            origin_relations.extend(implementers.iter().filter_map(|k| index.symbols.get(k)).copied());
        }

        let display = compilation.display_string(*symbol);
        if implements_transitively(compilation, *symbol, "IRequest") {
            if let Some(handlers) = index.mediator_request_handlers.get(&display) {
                origin_relations.extend(handlers.iter().filter_map(|k| index.symbols.get(k)).copied());
            }
        }
        if implements_transitively(compilation, *symbol, "INotification") {
            if let Some(handlers) = index.mediator_notification_handlers.get(&display) {
                origin_relations.extend(handlers.iter().filter_map(|k| index.symbols.get(k)).copied());
            }
        }

        // Interface member: bring in each implementing type and its member override.
        if let Some(containing) = compilation.containing_type_of(*symbol) {
            let containing_key = symbol_key(compilation, containing);
            if let Some(implementers) = index.impls_by_interface.get(&containing_key) {
                let member_name =
                    compilation.symbol_property(*symbol, "Name").and_then(|v| v.as_match_string());
                for impl_key in implementers {
                    let Some(&implementer) = index.symbols.get(impl_key) else { continue };
                    origin_relations.push(implementer);
                    if let Some(name) = &member_name {
                        for member in compilation.members_of(implementer) {
                            let matches = compilation
                                .symbol_property(member, "Name")
                                .and_then(|v| v.as_match_string())
                                .as_deref()
                                == Some(name.as_str());
                            if matches {
                                origin_relations.push(member);
                            }
                        }
                    }
                }
            }
        }
    }
    expanded.extend(origin_relations);
    expanded
}
