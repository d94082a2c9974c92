// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property resolution (C2), selector matching (C3), and batched
//! multi-selector dispatch (C4) over a generic `TreeProvider`.
//!
//! This crate knows nothing about flow graphs or the rule catalog; it only
//! answers "does this selector match at this node, and what did it
//! capture". `flowql-flow` and `flowql-analyzer` build on top of it.

mod capture;
mod context;
mod dispatch;
mod engine;
mod resolve;

pub use capture::CaptureState;
pub use context::{find_root, MatchContext, QueryContext, SymbolResolver};
pub use dispatch::Dispatcher;
pub use engine::{anchor_kind_hints, query_all, query_first, query_matches, Engine, KindScheme, Match};
pub use resolve::resolve_path;
