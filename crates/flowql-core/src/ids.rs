// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

/// A stable identifier for a flow-graph node (§3).
///
/// If the originating symbol carries a source location, this is the
/// symbol's documentation-comment id (or its display string as a fallback);
/// otherwise it is the synthetic form `"{path}:{startOffset}-{endOffset}"`.
/// Equal ids always denote the same node across builds (Testable Property 5).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    #[inline]
    pub fn from_documentation_id(doc_id: impl Into<String>) -> Self {
        Self(doc_id.into())
    }

    #[inline]
    pub fn synthetic(path: &str, start_offset: u32, end_offset: u32) -> Self {
        Self(format!("{path}:{start_offset}-{end_offset}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A deterministic equality key for a bound symbol.
///
/// Symbol identity must use this key (documentation id, falling back to
/// display string) rather than object/pointer identity (§5) — two distinct
/// in-memory symbol handles that describe the same declared entity compare
/// equal under `SymbolKey`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolKey(pub String);

impl SymbolKey {
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
