// SPDX-License-Identifier: MIT OR Apache-2.0

/// A diagnostic's severity (§4.9). Severities map case-insensitively;
/// anything unrecognized, including blank, defaults to `Warning`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn from_config(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "error" => Severity::Error,
            "info" => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_and_blank_default_to_warning() {
        assert_eq!(Severity::from_config("Error"), Severity::Error);
        assert_eq!(Severity::from_config("INFO"), Severity::Info);
        assert_eq!(Severity::from_config("invalid"), Severity::Warning);
        assert_eq!(Severity::from_config(""), Severity::Warning);
    }
}
