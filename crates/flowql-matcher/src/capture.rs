// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

use flowql_core::Value;

struct Link {
    parent: Option<Rc<Link>>,
    key: String,
    value: Value,
    merged: OnceCell<HashMap<String, Value>>,
}

/// Immutable, parent-chained capture store (§9 "Capture propagation").
/// Each `:capture` adds a new link; children inherit the parent's chain by
/// cloning the `Rc`, never by copying the map. Read-through resolution
/// composes the chain lazily and caches the composition on the link it was
/// computed from.
#[derive(Clone, Default)]
pub struct CaptureState(Option<Rc<Link>>);

impl CaptureState {
    pub fn empty() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: Value) -> Self {
        Self(Some(Rc::new(Link {
            parent: self.0.clone(),
            key: key.into(),
            value,
            merged: OnceCell::new(),
        })))
    }

    /// Looks up `key`, preferring the most recently added (innermost)
    /// binding — a child shadows its parent's capture of the same name.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut cursor = self.0.clone();
        while let Some(link) = cursor {
            if link.key == key {
                return Some(link.value.clone());
            }
            cursor = link.parent.clone();
        }
        None
    }

    /// The full merged view, innermost bindings winning. Cached per link.
    pub fn merged(&self) -> HashMap<String, Value> {
        let Some(link) = &self.0 else {
            return HashMap::new();
        };
        link.merged
            .get_or_init(|| {
                let mut map = link.parent.as_ref().map_or_else(HashMap::new, |parent| {
                    CaptureState(Some(parent.clone())).merged()
                });
                map.insert(link.key.clone(), link.value.clone());
                map
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_shadows_parent_capture() {
        let root = CaptureState::empty().with("id", Value::str("outer"));
        let child = root.with("id", Value::str("inner"));
        assert_eq!(child.get("id"), Some(Value::str("inner")));
        assert_eq!(root.get("id"), Some(Value::str("outer")));
    }

    #[test]
    fn merged_view_includes_ancestors() {
        let root = CaptureState::empty().with("a", Value::str("1"));
        let child = root.with("b", Value::str("2"));
        let merged = child.merged();
        assert_eq!(merged.get("a"), Some(&Value::str("1")));
        assert_eq!(merged.get("b"), Some(&Value::str("2")));
    }
}
