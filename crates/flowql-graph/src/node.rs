// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use flowql_core::{NodeId, Span, Value};

/// A flow-graph node (§3). `kind` is the catalog-assigned type tag (e.g.
/// `"endpoint.controller_action"`), not a Rust type.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: String,
    pub name: String,
    pub fqdn: String,
    pub assembly: Option<String>,
    pub project: Option<String>,
    pub file_path: Option<String>,
    pub span: Option<Span>,
    pub symbol_id: Option<String>,
    pub tags: BTreeSet<String>,
    pub properties: BTreeMap<String, Value>,
}

impl Node {
    pub fn new(id: NodeId, kind: impl Into<String>, name: impl Into<String>, fqdn: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            fqdn: fqdn.into(),
            assembly: None,
            project: None,
            file_path: None,
            span: None,
            symbol_id: None,
            tags: BTreeSet::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Merges `other` into `self` (§3 "Node merge is idempotent"): the
    /// first non-empty scalar wins per field, tag sets union, and property
    /// maps union with the first non-empty value winning per key.
    pub fn merge(&mut self, other: Node) {
        if self.assembly.is_none() {
            self.assembly = other.assembly;
        }
        if self.project.is_none() {
            self.project = other.project;
        }
        if self.file_path.is_none() {
            self.file_path = other.file_path;
        }
        if self.span.is_none() {
            self.span = other.span;
        }
        if self.symbol_id.is_none() {
            self.symbol_id = other.symbol_id;
        }
        if self.kind.is_empty() {
            self.kind = other.kind;
        }
        if self.name.is_empty() {
            self.name = other.name;
        }
        if self.fqdn.is_empty() {
            self.fqdn = other.fqdn;
        }
        self.tags.extend(other.tags);
        for (key, value) in other.properties {
            self.properties
                .entry(key)
                .and_modify(|existing| {
                    if existing.is_none() {
                        *existing = value.clone();
                    }
                })
                .or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_first_non_empty_scalar_and_unions_tags() {
        let mut a = Node::new(NodeId::from("a".to_string()), "", "", "Ns.A");
        a.tags.insert("controller".to_string());
        let mut b = Node::new(NodeId::from("a".to_string()), "endpoint.controller", "A", "Ns.A");
        b.tags.insert("http".to_string());
        a.merge(b);
        assert_eq!(a.kind, "endpoint.controller");
        assert_eq!(a.tags, BTreeSet::from(["controller".to_string(), "http".to_string()]));
    }

    #[test]
    fn merge_keeps_first_non_empty_property_value() {
        let mut a = Node::new(NodeId::from("a".to_string()), "k", "A", "Ns.A");
        a.properties.insert("route".to_string(), Value::str("/a"));
        let mut b = Node::new(NodeId::from("a".to_string()), "k", "A", "Ns.A");
        b.properties.insert("route".to_string(), Value::str("/b"));
        a.merge(b);
        assert_eq!(a.properties.get("route"), Some(&Value::str("/a")));
    }
}
