// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use bit_set::BitSet;
use flowql_core::TreeProvider;
use flowql_selectors::ComplexSelectorList;

use crate::context::{MatchContext, QueryContext};
use crate::engine::{anchor_kind_hints, try_match_list, Engine, KindScheme, Match};

/// Evaluates many selectors in a single subtree walk (§4.4), pruning each
/// node against only the selectors whose top-level kind hints include it.
/// Selectors with no hint (an unconstrained anchor) are "global" and are
/// always attempted.
pub struct Dispatcher<'e, P: TreeProvider, S: KindScheme> {
    engine: &'e Engine<'e, P, S>,
    selectors: Vec<ComplexSelectorList>,
    global: BitSet,
    by_kind: HashMap<String, BitSet>,
}

impl<'e, P: TreeProvider, S: KindScheme> Dispatcher<'e, P, S> {
    pub fn new(engine: &'e Engine<'e, P, S>, selectors: Vec<ComplexSelectorList>) -> Self {
        let mut global = BitSet::new();
        let mut by_kind: HashMap<String, BitSet> = HashMap::new();
        for (idx, list) in selectors.iter().enumerate() {
            match list_hint(engine, list) {
                None => {
                    global.insert(idx);
                }
                Some(kinds) => {
                    for kind in kinds {
                        by_kind.entry(kind).or_default().insert(idx);
                    }
                }
            }
        }
        Self { engine, selectors, global, by_kind }
    }

    /// Walks from `start`, invoking `callback(selector_index, Match)` for
    /// every matching visit. Order across children is source order; order
    /// among selectors at one node is ascending by index (§4.4).
    pub fn run(&self, start: P::Node, qc: QueryContext<'_, P>, mut callback: impl FnMut(usize, Match<P>)) {
        self.visit(start, start, qc, &mut callback);
    }

    fn visit(
        &self,
        node: P::Node,
        scope: P::Node,
        qc: QueryContext<'_, P>,
        callback: &mut impl FnMut(usize, Match<P>),
    ) {
        let kind = self.engine.provider.kind_of(node);
        let mut candidates = self.global.clone();
        if let Some(set) = self.by_kind.get(kind) {
            candidates.union_with(set);
        }
        let ctx = MatchContext::root_query(self.engine.provider, node, scope, qc);
        for idx in candidates.iter() {
            if let Some(matched) = try_match_list(self.engine, &ctx, &self.selectors[idx]) {
                callback(idx, Match { node, symbol: matched.symbol(), captures: matched.captures });
            }
        }
        for child in self.engine.provider.children_of(node) {
            self.visit(child, scope, qc, callback);
        }
    }
}

fn list_hint<P: TreeProvider, S: KindScheme>(
    engine: &Engine<'_, P, S>,
    list: &ComplexSelectorList,
) -> Option<std::collections::HashSet<String>> {
    let mut set = std::collections::HashSet::new();
    for item in &list.items {
        set.extend(anchor_kind_hints(engine, item)?);
    }
    Some(set)
}
