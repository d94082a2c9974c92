// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use dashmap::DashMap;
use flowql_selectors::{ComplexSelectorList, ParseError};
use once_cell::sync::Lazy;

/// Process-wide cache of placeholder-substituted rule selectors (§5), keyed
/// by the substituted text under case-sensitive ordinal comparison (a plain
/// `String` key already compares that way). Parsing under contention is
/// idempotent: `DashMap::entry` serializes inserts per shard, so a racing
/// duplicate parse is simply discarded rather than observed.
static SUBSTITUTED_RULES: Lazy<DashMap<String, Arc<ComplexSelectorList>>> = Lazy::new(DashMap::new);

/// Parses (or returns the cached parse of) `substituted` — the result of
/// replacing `{Name}` in a templated rule with a matched node's identifier
/// text (§4.9).
pub fn compile_substituted(substituted: &str) -> Result<Arc<ComplexSelectorList>, ParseError> {
    if let Some(cached) = SUBSTITUTED_RULES.get(substituted) {
        return Ok(cached.clone());
    }
    let parsed = Arc::new(flowql_selectors::parse(substituted)?);
    Ok(SUBSTITUTED_RULES.entry(substituted.to_string()).or_insert_with(|| parsed.clone()).clone())
}
