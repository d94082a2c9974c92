// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors loading and registering analyzer rule configuration (§4.9).
#[derive(thiserror::Error, Debug)]
pub enum AnalyzerError {
    #[error("failed to read analyzer config {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("failed to parse analyzer config {path}: {source}")]
    Json { path: String, #[source] source: serde_json::Error },

    #[error("rule {index} selector {selector:?} failed to parse: {source}")]
    Selector { index: usize, selector: String, #[source] source: flowql_selectors::ParseError },
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
