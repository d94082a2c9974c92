// SPDX-License-Identifier: MIT OR Apache-2.0

use flowql_core::TreeProvider;

/// Gathers every bound symbol referenced within `root`'s subtree (§4.6
/// Phase B "gather bound symbols for every identifier, ..."). The generic
/// `TreeProvider` surface has no per-kind accessor, so this walks every node
/// and asks for its bound symbol uniformly; invocation/object-creation/
/// attribute nodes additionally contribute the extra symbol the spec calls
/// out for them (invocations: the method's reduced-from generic; object
/// creations: the constructed type; attributes: the attribute's containing
/// type), keyed on the same raw syntax-kind strings the rule catalog already
/// relies on for HTTP-call detection.
pub fn collect_referenced_symbols<P: TreeProvider>(provider: &P, root: P::Node) -> Vec<P::Symbol> {
    let mut out = Vec::new();
    walk(provider, root, &mut out);
    out
}

fn walk<P: TreeProvider>(provider: &P, node: P::Node, out: &mut Vec<P::Symbol>) {
    if let Some(symbol) = provider.bound_symbol(node) {
        out.push(symbol);
        match provider.kind_of(node) {
            "InvocationExpression" => {
                if let Some(generic_def) = provider.reduced_from_method(symbol) {
                    out.push(generic_def);
                }
            }
            "ObjectCreationExpression" => {
                if let Some(constructed) = provider.type_info(node) {
                    out.push(constructed);
                }
            }
            "Attribute" => {
                if let Some(containing) = provider.containing_type_of(symbol) {
                    out.push(containing);
                }
            }
            _ => {}
        }
    }
    for child in provider.children_of(node) {
        walk(provider, child, out);
    }
}

#[cfg(test)]
mod tests {
    use flowql_core::{Span, SymbolKind, Value};

    use super::*;

    /// One invocation node (1) bound to a constructed generic method (10)
    /// whose reduced-from definition is (11); root (0) has no symbol.
    struct InvocationTree;

    impl TreeProvider for InvocationTree {
        type Node = usize;
        type Symbol = usize;

        fn kind_of(&self, node: Self::Node) -> &str {
            if node == 1 { "InvocationExpression" } else { "Block" }
        }
        fn children_of(&self, node: Self::Node) -> Vec<Self::Node> {
            if node == 0 { vec![1] } else { Vec::new() }
        }
        fn parent_of(&self, node: Self::Node) -> Option<Self::Node> {
            (node == 1).then_some(0)
        }
        fn identifier_text_of(&self, _node: Self::Node) -> Option<String> {
            None
        }
        fn span_of(&self, _node: Self::Node) -> Option<Span> {
            None
        }
        fn file_path_of(&self, _node: Self::Node) -> Option<String> {
            None
        }
        fn declared_symbol(&self, _node: Self::Node) -> Option<Self::Symbol> {
            None
        }
        fn bound_symbol(&self, node: Self::Node) -> Option<Self::Symbol> {
            (node == 1).then_some(10)
        }
        fn type_info(&self, _node: Self::Node) -> Option<Self::Symbol> {
            None
        }
        fn constant_value(&self, _node: Self::Node) -> Option<Value> {
            None
        }
        fn attributes_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
            Vec::new()
        }
        fn base_types_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
            Vec::new()
        }
        fn interfaces_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
            Vec::new()
        }
        fn members_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
            Vec::new()
        }
        fn node_property(&self, _node: Self::Node, _name: &str) -> Option<Value> {
            None
        }
        fn symbol_property(&self, _symbol: Self::Symbol, _name: &str) -> Option<Value> {
            None
        }
        fn base_type_nodes_of(&self, _node: Self::Node) -> Vec<Self::Node> {
            Vec::new()
        }
        fn containing_type_of(&self, _symbol: Self::Symbol) -> Option<Self::Symbol> {
            None
        }
        fn documentation_id(&self, _symbol: Self::Symbol) -> Option<String> {
            None
        }
        fn display_string(&self, _symbol: Self::Symbol) -> String {
            String::new()
        }
        fn symbol_kind(&self, _symbol: Self::Symbol) -> SymbolKind {
            SymbolKind::Method
        }
        fn reduced_from_method(&self, symbol: Self::Symbol) -> Option<Self::Symbol> {
            (symbol == 10).then_some(11)
        }
    }

    #[test]
    fn invocation_contributes_the_method_and_its_reduced_from_generic() {
        let tree = InvocationTree;
        let referenced = collect_referenced_symbols(&tree, 0);
        assert_eq!(referenced, vec![10, 11]);
    }
}
