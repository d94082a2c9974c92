// SPDX-License-Identifier: MIT OR Apache-2.0

use flowql_core::Span;

use crate::severity::Severity;

/// One reported diagnostic (§4.9): which rule fired, where, at what
/// severity, with what message.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub rule_index: usize,
    pub message: String,
    pub severity: Severity,
    pub file_path: Option<String>,
    pub span: Option<Span>,
}
