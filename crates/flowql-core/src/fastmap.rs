// SPDX-License-Identifier: MIT OR Apache-2.0

/// A fast, thread-safe map used for the analyzer's process-wide rule cache
/// and the composer's internal accumulators. A plain alias rather than a
/// wrapper so call sites can use the full `dashmap::DashMap` API directly.
pub type FastMap<K, V> = dashmap::DashMap<K, V>;
