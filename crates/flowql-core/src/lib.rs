// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared primitives for the FlowQL workspace.
//!
//! This crate has no knowledge of selectors, matching, or graphs; it only
//! defines the pieces every other crate agrees on: stable identifiers, the
//! opaque `TreeProvider` interface syntax-tree/semantic-model libraries are
//! expected to implement, a normalized property value, and the shared error
//! type for argument/configuration/loader failures (`SelectorParseError`
//! lives in `flowql-selectors` since it carries parser-specific position
//! information).

mod cancel;
mod compilation;
mod error;
mod fastmap;
mod ids;
mod tree;
mod value;

pub use cancel::CancellationToken;
pub use compilation::Compilation;
pub use error::{Error, Result};
pub use fastmap::FastMap;
pub use ids::{NodeId, SymbolKey};
pub use tree::{Span, SymbolKind, TreeProvider};
pub use value::Value;
