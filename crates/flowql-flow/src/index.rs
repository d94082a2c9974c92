// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet};

use flowql_core::{Compilation, SymbolKey};

/// Type-relation maps precomputed once per compilation (§4.6 Phase A).
pub struct TypeIndex<C: Compilation> {
    pub derived_by_base: HashMap<SymbolKey, HashSet<SymbolKey>>,
    pub impls_by_interface: HashMap<SymbolKey, HashSet<SymbolKey>>,
    pub mediator_request_handlers: HashMap<String, HashSet<SymbolKey>>,
    pub mediator_notification_handlers: HashMap<String, HashSet<SymbolKey>>,
    pub symbols: HashMap<SymbolKey, C::Symbol>,
}

impl<C: Compilation> Default for TypeIndex<C> {
    fn default() -> Self {
        Self {
            derived_by_base: HashMap::new(),
            impls_by_interface: HashMap::new(),
            mediator_request_handlers: HashMap::new(),
            mediator_notification_handlers: HashMap::new(),
            symbols: HashMap::new(),
        }
    }
}

pub fn symbol_key<C: Compilation>(compilation: &C, symbol: C::Symbol) -> SymbolKey {
    SymbolKey::new(compilation.documentation_id(symbol).unwrap_or_else(|| compilation.display_string(symbol)))
}

fn interface_name<C: Compilation>(compilation: &C, iface: C::Symbol) -> Option<String> {
    compilation.symbol_property(iface, "Name").and_then(|v| v.as_match_string())
}

/// Mediator message type for a handler-ish interface (§4.6): interfaces
/// named `IRequestHandler`, `IRequestProcessor`, or `IPipelineBehavior`
/// carry their message type as `TypeArgument0` — the generic non-reflective
/// property gate already used elsewhere (§9).
fn mediator_request_message<C: Compilation>(compilation: &C, iface: C::Symbol) -> Option<String> {
    let name = interface_name(compilation, iface)?;
    matches!(name.as_str(), "IRequestHandler" | "IRequestProcessor" | "IPipelineBehavior")
        .then(|| compilation.symbol_property(iface, "TypeArgument0").and_then(|v| v.as_match_string()))
        .flatten()
}

fn mediator_notification_message<C: Compilation>(compilation: &C, iface: C::Symbol) -> Option<String> {
    let name = interface_name(compilation, iface)?;
    (name == "INotificationHandler")
        .then(|| compilation.symbol_property(iface, "TypeArgument0").and_then(|v| v.as_match_string()))
        .flatten()
}

/// Whether `ty` transitively implements an interface whose name is (or
/// starts with) `target`, e.g. `IRequest`/`INotification`.
pub fn implements_transitively<C: Compilation>(compilation: &C, ty: C::Symbol, target: &str) -> bool {
    fn walk<C: Compilation>(
        compilation: &C,
        ty: C::Symbol,
        target: &str,
        seen: &mut HashSet<SymbolKey>,
    ) -> bool {
        let key = symbol_key(compilation, ty);
        if !seen.insert(key) {
            return false;
        }
        for iface in compilation.interfaces_of(ty) {
            let name = interface_name(compilation, iface).unwrap_or_default();
            if name == target || name.starts_with(target) {
                return true;
            }
            if walk(compilation, iface, target, seen) {
                return true;
            }
        }
        for base in compilation.base_types_of(ty) {
            if walk(compilation, base, target, seen) {
                return true;
            }
        }
        false
    }
    walk(compilation, ty, target, &mut HashSet::new())
}

/// Builds the Phase A type-relation index by walking every named type once.
pub fn build_type_index<C: Compilation>(compilation: &C) -> TypeIndex<C> {
    let mut index = TypeIndex::default();
    for ty in compilation.named_types() {
        let key = symbol_key(compilation, ty);
        index.symbols.insert(key.clone(), ty);

        for base in compilation.base_types_of(ty) {
            let base_key = symbol_key(compilation, base);
            index.symbols.insert(base_key.clone(), base);
            index.derived_by_base.entry(base_key).or_default().insert(key.clone());
        }

        for iface in compilation.interfaces_of(ty) {
            let iface_key = symbol_key(compilation, iface);
            index.symbols.insert(iface_key.clone(), iface);
            index.impls_by_interface.entry(iface_key).or_default().insert(key.clone());

            if let Some(message) = mediator_request_message(compilation, iface) {
                index.mediator_request_handlers.entry(message).or_default().insert(key.clone());
            }
            if let Some(message) = mediator_notification_message(compilation, iface) {
                index.mediator_notification_handlers.entry(message).or_default().insert(key.clone());
            }
        }
    }
    index
}
