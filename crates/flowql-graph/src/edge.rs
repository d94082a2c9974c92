// SPDX-License-Identifier: MIT OR Apache-2.0

use flowql_core::NodeId;

/// One piece of source evidence backing an edge (§3, §6 dump shape).
#[derive(Clone, Debug, PartialEq)]
pub struct Evidence {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// A directed, typed relation between two nodes (§3).
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: String,
    pub source: String,
    pub confidence: f64,
    pub evidence: Vec<Evidence>,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, kind: impl Into<String>, source: impl Into<String>) -> Self {
        Self { from, to, kind: kind.into(), source: source.into(), confidence: 1.0, evidence: Vec::new() }
    }

    /// The `(from, to, kind)` dedupe/ordering key (§3, §5).
    pub fn dedupe_key(&self) -> (&NodeId, &NodeId, &str) {
        (&self.from, &self.to, &self.kind)
    }
}
