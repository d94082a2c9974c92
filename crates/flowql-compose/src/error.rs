// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors from loading and merging workspace definition files (§4.8, §6).
#[derive(thiserror::Error, Debug)]
pub enum ComposeError {
    #[error("failed to read workspace file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("failed to parse workspace file {path}: {source}")]
    Json { path: String, #[source] source: serde_json::Error },
}

pub type Result<T> = std::result::Result<T, ComposeError>;
