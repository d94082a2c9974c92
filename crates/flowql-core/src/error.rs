// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors shared across the workspace that are not specific to selector
/// parsing (which carries its own `position`-bearing error type).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A null/blank input was passed to a public constructor (workspace
    /// path, selector text, ...).
    #[error("argument error: {0}")]
    Argument(String),

    /// The diagnostic analyzer host was asked to run with no configuration
    /// loaded.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO or JSON problems loading workspace definition files. Callers are
    /// expected to log and continue with a best-effort subset rather than
    /// treat this as fatal.
    #[error("loader error: {0}")]
    Loader(String),
}

pub type Result<T> = std::result::Result<T, Error>;
