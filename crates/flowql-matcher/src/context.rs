// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use flowql_core::{TreeProvider, Value};

use crate::capture::CaptureState;

/// A caller-supplied override for §4.3 symbol resolution, injected via
/// `queryContext`. Takes priority over the default declared/bound/candidate
/// tiers when present.
pub type SymbolResolver<'a, P> = dyn Fn(&P, <P as TreeProvider>::Node) -> Option<<P as TreeProvider>::Symbol> + 'a;

/// Extra inputs a caller may thread into a query (§6 "queryContext").
pub struct QueryContext<'a, P: TreeProvider> {
    pub metadata: Option<&'a HashMap<String, Value>>,
    pub resolver: Option<&'a SymbolResolver<'a, P>>,
}

impl<'a, P: TreeProvider> Clone for QueryContext<'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P: TreeProvider> Copy for QueryContext<'a, P> {}

impl<'a, P: TreeProvider> Default for QueryContext<'a, P> {
    fn default() -> Self {
        Self { metadata: None, resolver: None }
    }
}

/// Per-evaluation-point state (§3 "Match Context"). Cheap to clone: the
/// node/symbol handles are `Copy`, the provider and metadata are shared
/// references, and captures are an `Rc`-backed persistent chain.
pub struct MatchContext<'a, P: TreeProvider> {
    pub provider: &'a P,
    pub node: P::Node,
    pub scope: P::Node,
    pub root: P::Node,
    pub metadata: Option<&'a HashMap<String, Value>>,
    pub resolver: Option<&'a SymbolResolver<'a, P>>,
    pub captures: CaptureState,
}

impl<'a, P: TreeProvider> Clone for MatchContext<'a, P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider,
            node: self.node,
            scope: self.scope,
            root: self.root,
            metadata: self.metadata,
            resolver: self.resolver,
            captures: self.captures.clone(),
        }
    }
}

impl<'a, P: TreeProvider> MatchContext<'a, P> {
    pub fn root_query(provider: &'a P, node: P::Node, scope: P::Node, qc: QueryContext<'a, P>) -> Self {
        Self {
            provider,
            node,
            root: find_root(provider, node),
            scope,
            metadata: qc.metadata,
            resolver: qc.resolver,
            captures: CaptureState::empty(),
        }
    }

    #[must_use]
    pub fn at_node(&self, node: P::Node) -> Self {
        Self { node, ..self.clone() }
    }

    #[must_use]
    pub fn with_capture(&self, alias: impl Into<String>, value: Value) -> Self {
        Self { captures: self.captures.with(alias, value), ..self.clone() }
    }

    /// Symbol resolution order (§4.3): a caller-injected resolver wins
    /// outright; otherwise prefer the declared symbol, fall back to the
    /// node's bound symbol, then to the first candidate symbol if the
    /// binding is ambiguous.
    pub fn symbol(&self) -> Option<P::Symbol> {
        if let Some(resolver) = self.resolver {
            return resolver(self.provider, self.node);
        }
        self.provider
            .declared_symbol(self.node)
            .or_else(|| self.provider.bound_symbol(self.node))
            .or_else(|| self.provider.candidate_symbols(self.node).into_iter().next())
    }
}

pub fn find_root<P: TreeProvider>(provider: &P, node: P::Node) -> P::Node {
    let mut current = node;
    while let Some(parent) = provider.parent_of(current) {
        current = parent;
    }
    current
}
