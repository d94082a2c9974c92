// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::tree::TreeProvider;

/// The unit the flow-graph builder (C6) operates over: a set of syntax
/// trees plus enough of the semantic surface to enumerate named types for
/// Phase A indexing (§4.6). A real binding backs this with a Roslyn
/// `Compilation` or an equivalent whole-program semantic view; this trait
/// only asks for what the builder actually walks.
pub trait Compilation: TreeProvider {
    /// Root nodes of every syntax tree currently part of the compilation.
    fn syntax_trees(&self) -> Vec<Self::Node>;

    /// Every named type symbol reachable from the global namespace, used to
    /// build `derivedByBase`/`implsByInterface`/mediator maps (§4.6 Phase A).
    fn named_types(&self) -> Vec<Self::Symbol>;
}
