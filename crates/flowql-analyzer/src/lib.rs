// SPDX-License-Identifier: MIT OR Apache-2.0

//! The diagnostic analyzer host (C9): loads a selector-driven rule
//! configuration and runs it over a compilation, reporting diagnostics.

mod cache;
mod config;
mod diagnostic;
mod error;
mod host;
mod severity;

pub use config::{AnalyzerConfig, Rule, RuleAction};
pub use diagnostic::Diagnostic;
pub use error::{AnalyzerError, Result};
pub use host::analyze;
pub use severity::Severity;
