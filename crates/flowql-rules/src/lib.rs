// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed layered-architecture rule catalog (C5): a selector, node type,
//! tags, and optional property extractor per recognized concept. Consumed
//! by the flow-graph builder, which walks it over a batched dispatch pass
//! and never reasons about selector syntax directly.

mod catalog;
mod extractors;
mod route;

pub use catalog::{catalog, Extractor, ExtractorContext, Rule};
pub use extractors::{controller_action_extractor, controller_extractor, http_call_extractor};
pub use route::{canonicalize_route, compose_full_route, verb_from_attribute_name, verb_from_method_name};
