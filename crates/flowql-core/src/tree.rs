// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Debug;
use std::hash::Hash;

use crate::Value;

/// A source span, used for node spans and edge evidence lines (§3, §6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start_offset: u32,
    pub end_offset: u32,
    pub start_line: u32,
    pub end_line: u32,
}

/// Coarse symbol-kind discriminant (§4.6 Phase B's per-kind expansion).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Method,
    PropertyLike,
    Type,
    Other,
}

/// The out-of-scope syntax-tree/semantic-model library, reduced to the
/// small set of operations the selector engine and flow-graph builder
/// actually need (§9 "Property resolution without reflection").
///
/// Selector matching (`flowql-matcher`) and graph building (`flowql-flow`)
/// are generic over an implementation of this trait; they never reach for
/// reflection or assume a concrete tree representation. A real binding
/// (Roslyn, tree-sitter + a semantic layer, ...) implements this once and
/// everything above it is reusable.
pub trait TreeProvider {
    /// A syntax node handle. Cheap to copy; comparisons are structural
    /// position identity, not content equality.
    type Node: Copy + Eq + Hash + Debug;

    /// A bound symbol handle. Two handles that describe the same declared
    /// entity need not be `Eq` at the Rust level — callers must compare via
    /// `documentation_id`/`SymbolKey`, never via this type's own equality.
    type Symbol: Copy + Eq + Hash + Debug;

    fn kind_of(&self, node: Self::Node) -> &str;
    fn children_of(&self, node: Self::Node) -> Vec<Self::Node>;
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;
    fn identifier_text_of(&self, node: Self::Node) -> Option<String>;
    fn span_of(&self, node: Self::Node) -> Option<Span>;
    fn file_path_of(&self, node: Self::Node) -> Option<String>;

    fn declared_symbol(&self, node: Self::Node) -> Option<Self::Symbol>;
    fn bound_symbol(&self, node: Self::Node) -> Option<Self::Symbol>;
    /// The node's static type (§4.2 `Type` root, first link in its fallback
    /// chain).
    fn type_info(&self, node: Self::Node) -> Option<Self::Symbol>;
    fn constant_value(&self, node: Self::Node) -> Option<Value>;

    /// The type a node converts to through an implicit/explicit conversion
    /// (§4.2 `ConvertedType` root, and `Type`'s second fallback). Distinct
    /// from `type_info`: most nodes have no conversion and answer `None`.
    fn converted_type_info(&self, _node: Self::Node) -> Option<Self::Symbol> {
        None
    }

    /// Candidate symbols a node's binding could resolve to when ambiguous
    /// (§4.3 symbol resolution's third tier, "the first candidate symbol if
    /// ambiguous"). Empty when this provider never reports ambiguous
    /// bindings.
    fn candidate_symbols(&self, _node: Self::Node) -> Vec<Self::Symbol> {
        Vec::new()
    }

    fn attributes_of(&self, symbol: Self::Symbol) -> Vec<Self::Symbol>;
    fn base_types_of(&self, symbol: Self::Symbol) -> Vec<Self::Symbol>;
    fn interfaces_of(&self, symbol: Self::Symbol) -> Vec<Self::Symbol>;
    fn members_of(&self, symbol: Self::Symbol) -> Vec<Self::Symbol>;

    /// Member lookup on a bound symbol that itself yields another symbol,
    /// letting a property path continue past it (`Symbol.ContainingType.Name`,
    /// §4.2). `None` when `name` isn't a member or resolves to a scalar
    /// rather than a symbol — callers fall back to `symbol_property` for the
    /// terminal segment of a path.
    fn symbol_member(&self, _symbol: Self::Symbol, _name: &str) -> Option<Self::Symbol> {
        None
    }

    /// Coarse kind discriminant driving §4.6 Phase B's per-kind expansion.
    /// `Other` for symbol kinds (locals, namespaces, ...) that propagate
    /// the same way regardless of kind.
    fn symbol_kind(&self, _symbol: Self::Symbol) -> SymbolKind {
        SymbolKind::Other
    }

    /// A callable's return type (§4.6 Phase B "Method -> ... return type").
    fn return_type_of(&self, _symbol: Self::Symbol) -> Option<Self::Symbol> {
        None
    }

    /// A callable's parameter types, in declaration order (§4.6 Phase B
    /// "Method -> ... parameter types").
    fn parameter_types_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }

    /// The other declarations of a partial method/type (§4.6 Phase B
    /// "Method -> ... partial counterparts").
    fn partial_counterparts_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }

    /// A property/field/event's value type (§4.6 Phase B
    /// "Property/Field/Event -> containing type + value type").
    fn value_type_of(&self, _symbol: Self::Symbol) -> Option<Self::Symbol> {
        None
    }

    /// A generic type's type arguments (§4.6 Phase B "Type -> base type,
    /// direct interfaces, type arguments").
    fn type_arguments_of(&self, _symbol: Self::Symbol) -> Vec<Self::Symbol> {
        Vec::new()
    }

    /// For an invocation's resolved method, the unreduced generic-method
    /// definition it was constructed/reduced from (§4.6 Phase B "Invocations
    /// add both the method and its reduced-from generic"). `None` when the
    /// method isn't a constructed generic.
    fn reduced_from_method(&self, _symbol: Self::Symbol) -> Option<Self::Symbol> {
        None
    }

    /// Whether `symbol` is a namespace (§4.6 Phase B "skip namespaces").
    fn is_namespace(&self, _symbol: Self::Symbol) -> bool {
        false
    }

    /// Whether `symbol` has a declaration inside the compilation under
    /// analysis, as opposed to a referenced assembly/metadata-only symbol
    /// (§4.6 Phase B "skip references external to source"). Defaults to
    /// `true`: a provider with no external-symbol concept treats everything
    /// it reports as in-source.
    fn has_source_location(&self, _symbol: Self::Symbol) -> bool {
        true
    }

    /// The declared symbol's "type-ish" projection (§4.2 `Type` root's third
    /// fallback): return type for a callable, value type for a
    /// property/field/event. `None` for symbol kinds with no such
    /// projection (types, namespaces, locals, ...).
    fn type_ish_projection(&self, symbol: Self::Symbol) -> Option<Self::Symbol> {
        match self.symbol_kind(symbol) {
            SymbolKind::Method => self.return_type_of(symbol),
            SymbolKind::PropertyLike => self.value_type_of(symbol),
            SymbolKind::Type | SymbolKind::Other => None,
        }
    }

    /// Named, non-reflective property access on a node (e.g. `Name`,
    /// `Modifiers`) — the gate a property path walks through instead of
    /// runtime reflection. Lookup is case-insensitive (§4.2).
    fn node_property(&self, node: Self::Node, name: &str) -> Option<Value>;

    /// Same as `node_property` but for a bound symbol (`Symbol.Name`,
    /// `Type.IsAbstract`, ...). `DisplayString` is handled separately by
    /// callers via `display_string` and need not be special-cased here.
    fn symbol_property(&self, symbol: Self::Symbol, name: &str) -> Option<Value>;

    /// Direct (non-transitive) base-list entries of a type declaration, as
    /// syntax nodes rather than resolved symbols — what `:implements`
    /// matches a selector list against (direct `SimpleBaseType` entries
    /// only, per the open-question resolution recorded in DESIGN.md).
    fn base_type_nodes_of(&self, node: Self::Node) -> Vec<Self::Node>;

    /// The type declaring `symbol` (a method/property/field's enclosing
    /// class/struct/interface). Used by the rule catalog to inherit
    /// controller context onto its actions, and by the flow-graph builder
    /// to expand a referenced member into its containing type (§4.6).
    fn containing_type_of(&self, symbol: Self::Symbol) -> Option<Self::Symbol>;

    /// Canonical stable identifier for a symbol (§3 node-id derivation, §5
    /// node-id stability). `None` for symbols with no durable identity
    /// (e.g. purely local inference artifacts).
    fn documentation_id(&self, symbol: Self::Symbol) -> Option<String>;

    /// Human-readable canonical form, used as the node-id fallback and as
    /// the special-cased `DisplayString` member in property resolution.
    fn display_string(&self, symbol: Self::Symbol) -> String;
}
