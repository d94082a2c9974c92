// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Mutex;

use flowql_graph::Graph;

use crate::remote::augment;
use crate::workspace::WorkspaceDefinition;

/// Thread-safe accumulator for per-project graphs (§4.7 C7).
///
/// `add_graph` is safe under concurrent callers: it takes the single mutex
/// that covers both the node map and the edge set (merge/dedupe both live
/// inside `Graph`, so one lock suffices — §5 "guarded by a single mutex
/// covering both").
#[derive(Default)]
pub struct Composition {
    merged: Mutex<Graph>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `graph` into the accumulator: nodes by id (which, per
    /// Testable Property 5, coincides with fqdn-stable identity), edges by
    /// `(from, to, kind)`.
    pub fn add_graph(&self, graph: Graph) {
        let mut merged = self.merged.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        merged.extend(graph.nodes);
        merged.extend(graph.edges);
    }

    /// Emits the merged graph, augmented with cross-service `remote` edges
    /// (§4.7 step 2), finalized into deterministic sorted order.
    pub fn build(&self, workspace: &WorkspaceDefinition) -> Graph {
        let mut snapshot = {
            let merged = self.merged.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            merged.clone()
        };
        augment(&mut snapshot, workspace);
        snapshot.finalize();
        snapshot
    }
}

/// Convenience one-shot composition (§4.7): `Compose(iterable of graphs)`.
pub fn compose(graphs: impl IntoIterator<Item = Graph>, workspace: &WorkspaceDefinition) -> Graph {
    let composition = Composition::new();
    for graph in graphs {
        composition.add_graph(graph);
    }
    composition.build(workspace)
}
