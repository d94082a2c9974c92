// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet};

use flowql_core::NodeId;

use crate::edge::Edge;
use crate::node::Node;

/// A finished flow graph (§3): nodes keyed by id, deduplicated edges.
/// Construction order does not matter; `finalize` imposes the deterministic
/// emission order (nodes by fqdn, edges by `(from, to, kind)`, both
/// ordinal) required for byte-identical dumps (§5, Testable Property 3).
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    node_index: HashMap<NodeId, usize>,
    edge_keys: HashSet<(NodeId, NodeId, String)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or merges a node by id (§3 "at most one node per id").
    pub fn upsert_node(&mut self, node: Node) {
        if let Some(&idx) = self.node_index.get(&node.id) {
            self.nodes[idx].merge(node);
        } else {
            self.node_index.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
    }

    /// Inserts an edge, deduped by `(from, to, kind)` — first write wins.
    pub fn insert_edge(&mut self, edge: Edge) {
        let key = (edge.from.clone(), edge.to.clone(), edge.kind.clone());
        if self.edge_keys.insert(key) {
            self.edges.push(edge);
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Sorts nodes by fqdn and edges by `(from, to, kind)`, both ordinal
    /// (plain `Ord` on `String`/`NodeId` already is ordinal comparison).
    pub fn finalize(&mut self) {
        self.nodes.sort_by(|a, b| a.fqdn.cmp(&b.fqdn));
        self.edges.sort_by(|a, b| a.dedupe_key().cmp(&b.dedupe_key()));
        self.node_index = self.nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();
    }
}

impl Extend<Node> for Graph {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        for node in iter {
            self.upsert_node(node);
        }
    }
}

impl Extend<Edge> for Graph {
    fn extend<I: IntoIterator<Item = Edge>>(&mut self, iter: I) {
        for edge in iter {
            self.insert_edge(edge);
        }
    }
}
