// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flow-graph data model (§3): nodes, edges, deterministic sorted
//! emission, and the stable JSON dump shape (§6). This crate has no
//! knowledge of how a graph is built — see `flowql-flow` and
//! `flowql-compose` for that — only how one is represented and rendered.

mod dump;
mod edge;
mod graph;
mod node;

pub use dump::{EdgeDump, EvidenceDump, GraphDump, NodeDump, SpanDump};
pub use edge::{Edge, Evidence};
pub use graph::Graph;
pub use node::Node;
