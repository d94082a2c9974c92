// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

/// A normalized property value, as returned by property-path resolution
/// (§4.2) and stored in match-context metadata, node properties, and
/// rule-extracted attributes.
///
/// Resolution always normalizes down to one of these shapes before a
/// selector's string/numeric matcher looks at it: symbols become their
/// display string, enumerables become a `List`, and everything else is
/// either a scalar or absent.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    None,
}

impl Value {
    #[inline]
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// String form used by CSS-style string matchers (`=`, `*=`, `^=`, ...).
    ///
    /// Lists are space-joined, preserving order of first occurrence of
    /// non-empty element forms (§4.2).
    pub fn as_match_string(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::List(items) => {
                let mut seen = std::collections::HashSet::new();
                let joined = items
                    .iter()
                    .filter_map(Value::as_match_string)
                    .filter(|s| !s.is_empty())
                    .filter(|s| seen.insert(s.clone()))
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(joined)
            }
            Value::None => None,
        }
    }

    /// Integer coercion used by numeric attribute matchers (§4.2): an
    /// enumerable with a count uses that count, a scalar integer is used
    /// directly, otherwise coercion fails and the matcher treats the
    /// property as unresolvable.
    pub fn as_match_integer(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::List(items) => Some(items.len() as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Str(s) => s.parse().ok(),
            Value::None => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_match_string() {
            Some(s) => f.write_str(&s),
            None => Ok(()),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_join_dedupes_preserving_first_occurrence_order() {
        let value = Value::List(vec![
            Value::str("b"),
            Value::str("a"),
            Value::str("b"),
            Value::str(""),
        ]);
        assert_eq!(value.as_match_string().as_deref(), Some("b a"));
    }

    #[test]
    fn integer_coercion_prefers_count_for_lists() {
        let value = Value::List(vec![Value::str("x"), Value::str("y"), Value::str("z")]);
        assert_eq!(value.as_match_integer(), Some(3));
    }
}
