// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flow-graph builder (C6): runs the rule catalog over a compilation
//! (Phase A), propagates referenced symbols into `flow` edges (Phase B),
//! and emits a finalized, deterministically ordered graph (Phase C).

mod builder;
mod index;
mod node_builder;
mod reference;

pub use builder::build;
pub use index::{build_type_index, implements_transitively, symbol_key, TypeIndex};
pub use node_builder::NodeBuilder;
pub use reference::collect_referenced_symbols;
