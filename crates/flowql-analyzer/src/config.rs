// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::Path;

use flowql_selectors::ComplexSelectorList;
use serde::Deserialize;

use crate::error::{AnalyzerError, Result};
use crate::severity::Severity;

/// What a rule checks once its `selector` matches (§4.9).
pub enum RuleAction {
    /// No `rule`: report unconditionally at the matched node.
    ReportMatch,
    /// `rule` with no `{placeholder}` tokens: precompiled once, report when
    /// `query_first` against it finds nothing under the matched node.
    Static(ComplexSelectorList),
    /// `rule` containing `{placeholder}` tokens: substituted per match and
    /// parsed lazily through the shared cache.
    Templated(String),
}

/// One registered rule: an anchor `selector`, an optional sub-`rule`, the
/// message to report, and its severity (§4.9).
pub struct Rule {
    pub selector: ComplexSelectorList,
    pub action: RuleAction,
    pub message: String,
    pub severity: Severity,
}

#[derive(Deserialize)]
struct RuleEntry {
    selector: String,
    rule: Option<String>,
    message: String,
    #[serde(default)]
    severity: String,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

/// A loaded set of analyzer rules (§4.9), each selector parsed up front so
/// a bad rule fails fast rather than mid-run.
pub struct AnalyzerConfig {
    pub rules: Vec<Rule>,
}

impl AnalyzerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_json::from_str(text).map_err(|source| AnalyzerError::Json { path: "<config>".to_string(), source })?;
        Self::from_entries(file.rules)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| AnalyzerError::Io { path: path.display().to_string(), source })?;
        let file: ConfigFile = serde_json::from_str(&text)
            .map_err(|source| AnalyzerError::Json { path: path.display().to_string(), source })?;
        Self::from_entries(file.rules)
    }

    fn from_entries(entries: Vec<RuleEntry>) -> Result<Self> {
        let mut rules = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let selector = flowql_selectors::parse(&entry.selector).map_err(|source| AnalyzerError::Selector {
                index,
                selector: entry.selector.clone(),
                source,
            })?;
            let action = match entry.rule {
                None => RuleAction::ReportMatch,
                Some(rule_text) if rule_text.contains('{') => RuleAction::Templated(rule_text),
                Some(rule_text) => {
                    let parsed = flowql_selectors::parse(&rule_text).map_err(|source| AnalyzerError::Selector {
                        index,
                        selector: rule_text.clone(),
                        source,
                    })?;
                    RuleAction::Static(parsed)
                }
            };
            rules.push(Rule { selector, action, message: entry.message, severity: Severity::from_config(&entry.severity) });
        }
        Ok(Self { rules })
    }
}
