// SPDX-License-Identifier: MIT OR Apache-2.0

/// A selector failed to parse. `position` is the 1-based index into the
/// input at which the parser could make no further progress (§4.1:
/// "Unexpected input fails with `position = index+1`").
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("selector parse error at position {position}: {message} (near {snippet:?})")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
    pub snippet: String,
}

impl ParseError {
    pub(crate) fn at(message: impl Into<String>, index: usize, input: &[char]) -> Self {
        let start = index.saturating_sub(8);
        let end = (index + 8).min(input.len());
        let snippet: String = input[start..end].iter().collect();
        Self {
            message: message.into(),
            position: index + 1,
            snippet,
        }
    }
}
