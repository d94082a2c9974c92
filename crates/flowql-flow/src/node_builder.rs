// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use flowql_core::{NodeId, Span, TreeProvider, Value};
use flowql_graph::Node;

/// Accumulates the catalog rule(s) that matched one flow-graph node across
/// possibly several Phase-A visits, before emission finalizes it into a
/// `flowql_graph::Node` (§4.6 Phase A/C).
pub struct NodeBuilder<P: TreeProvider> {
    pub id: NodeId,
    pub origin_symbol: Option<P::Symbol>,
    pub node_type: Option<String>,
    pub tags: BTreeSet<String>,
    pub properties: BTreeMap<String, Value>,
    pub file_path: Option<String>,
    pub span: Option<Span>,
    pub snapshots: Vec<P::Node>,
}

impl<P: TreeProvider> NodeBuilder<P> {
    pub fn new(id: NodeId, origin_symbol: Option<P::Symbol>) -> Self {
        Self {
            id,
            origin_symbol,
            node_type: None,
            tags: BTreeSet::new(),
            properties: BTreeMap::new(),
            file_path: None,
            span: None,
            snapshots: Vec::new(),
        }
    }

    /// Merges one rule match's contribution: sets `type` if unset, unions
    /// tags, and applies extracted properties first-non-empty-wins per key.
    pub fn merge_rule(
        &mut self,
        node_type: &str,
        tags: &[&str],
        properties: BTreeMap<String, Value>,
    ) {
        if self.node_type.is_none() {
            self.node_type = Some(node_type.to_string());
        }
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        for (key, value) in properties {
            self.properties.entry(key).or_insert(value);
        }
    }

    pub fn record_snapshot(&mut self, provider: &P, node: P::Node) {
        if self.file_path.is_none() {
            self.file_path = provider.file_path_of(node);
        }
        if self.span.is_none() {
            self.span = provider.span_of(node);
        }
        self.snapshots.push(node);
    }

    /// Phase C emission (§4.6): fills in sensible defaults for a node with
    /// no catalog rule contribution (a referenced-symbol-only target).
    pub fn into_node(self, provider: &P, default_project: Option<&str>) -> Node {
        let name = self
            .origin_symbol
            .and_then(|s| provider.symbol_property(s, "Name").and_then(|v| v.as_match_string()))
            .or_else(|| self.origin_symbol.map(|s| provider.display_string(s)))
            .unwrap_or_default();
        let fqdn = self.origin_symbol.map(|s| provider.display_string(s)).unwrap_or_else(|| name.clone());
        let assembly = self
            .origin_symbol
            .and_then(|s| provider.symbol_property(s, "Assembly"))
            .and_then(|v| v.as_match_string());
        let project = default_project.map(str::to_string).or_else(|| assembly.clone());

        let mut node = Node::new(self.id, self.node_type.unwrap_or_else(|| "symbol".to_string()), name, fqdn);
        node.assembly = assembly;
        node.project = project;
        node.file_path = self.file_path;
        node.span = self.span;
        node.symbol_id = self.origin_symbol.map(|s| provider.display_string(s));
        node.tags = self.tags;
        node.properties = self.properties;
        node
    }
}
