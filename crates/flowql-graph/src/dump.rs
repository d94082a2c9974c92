// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::edge::{Edge, Evidence};
use crate::graph::Graph;
use crate::node::Node;

/// The stable JSON dump shape (§6). Kept separate from the in-memory
/// `Node`/`Edge` types so internal representation changes never silently
/// change the wire format.
#[derive(Serialize)]
pub struct GraphDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Serialize)]
pub struct NodeDump {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Fqdn")]
    pub fqdn: String,
    #[serde(rename = "Assembly")]
    pub assembly: Option<String>,
    #[serde(rename = "Project")]
    pub project: Option<String>,
    #[serde(rename = "Span")]
    pub span: Option<SpanDump>,
    #[serde(rename = "SymbolId")]
    pub symbol_id: Option<String>,
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
    #[serde(rename = "Properties")]
    pub properties: BTreeMap<String, Option<String>>,
}

#[derive(Serialize)]
pub struct SpanDump {
    #[serde(rename = "StartLine")]
    pub start_line: u32,
    #[serde(rename = "EndLine")]
    pub end_line: u32,
}

#[derive(Serialize)]
pub struct EdgeDump {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Kind")]
    pub kind: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    #[serde(rename = "Evidence")]
    pub evidence: Option<Vec<EvidenceDump>>,
}

#[derive(Serialize)]
pub struct EvidenceDump {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "StartLine")]
    pub start_line: u32,
    #[serde(rename = "EndLine")]
    pub end_line: u32,
}

impl From<&Node> for NodeDump {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.as_str().to_string(),
            kind: node.kind.clone(),
            name: node.name.clone(),
            fqdn: node.fqdn.clone(),
            assembly: node.assembly.clone(),
            project: node.project.clone(),
            span: node.span.map(|s| SpanDump { start_line: s.start_line, end_line: s.end_line }),
            symbol_id: node.symbol_id.clone(),
            tags: node.tags.iter().cloned().collect(),
            properties: node.properties.iter().map(|(k, v)| (k.clone(), v.as_match_string())).collect(),
        }
    }
}

impl From<&Evidence> for EvidenceDump {
    fn from(evidence: &Evidence) -> Self {
        Self { path: evidence.path.clone(), start_line: evidence.start_line, end_line: evidence.end_line }
    }
}

impl From<&Edge> for EdgeDump {
    fn from(edge: &Edge) -> Self {
        Self {
            from: edge.from.as_str().to_string(),
            to: edge.to.as_str().to_string(),
            kind: edge.kind.clone(),
            source: edge.source.clone(),
            confidence: edge.confidence,
            evidence: (!edge.evidence.is_empty())
                .then(|| edge.evidence.iter().map(EvidenceDump::from).collect()),
        }
    }
}

impl From<&Graph> for GraphDump {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes.iter().map(NodeDump::from).collect(),
            edges: graph.edges.iter().map(EdgeDump::from).collect(),
        }
    }
}

impl Graph {
    /// Renders the finalized graph to the stable JSON dump shape (§6).
    /// Callers must have called `finalize()` first for deterministic
    /// ordering; this method does not sort.
    pub fn to_dump(&self) -> GraphDump {
        GraphDump::from(self)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_dump())
    }
}
