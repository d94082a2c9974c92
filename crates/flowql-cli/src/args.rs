// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use clap::Parser;

/// Long options that take a value (§6 CLI surface). Checked against raw
/// argv before clap ever sees it, so a dangling `--workspace` at the end
/// of the command line (or immediately followed by another option) fails
/// with the exact wording the spec requires rather than clap's own.
const VALUE_OPTIONS: &[&str] =
    &["--workspace", "--solution", "--solutions", "--flow", "--flows", "--max-depth", "--concurrency", "--dump-graph", "--output-dir"];

/// Scans raw argv for a value-taking option with nothing (or another
/// option) after it. Returns the offending option text.
pub fn find_missing_value(args: &[String]) -> Option<&str> {
    for (idx, arg) in args.iter().enumerate() {
        let opt = arg.split('=').next().unwrap_or(arg);
        if arg.contains('=') {
            continue;
        }
        if VALUE_OPTIONS.contains(&opt) {
            match args.get(idx + 1) {
                None => return Some(opt),
                Some(next) if next.starts_with("--") => return Some(opt),
                Some(_) => {}
            }
        }
    }
    None
}

/// `flow` (§6 CLI surface): builds a composed, augmented flow graph from a
/// workspace and dumps it as JSON.
#[derive(Parser, Debug)]
#[command(name = "flow", about = "Build and compose flow graphs across a workspace")]
pub struct Cli {
    /// Root directory containing `flow.workspace.json` / `flow.map.json`.
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Explicit solution paths, overriding workspace-file/`*.sln` discovery.
    #[arg(long = "solution", alias = "solutions", value_delimiter = ',')]
    pub solution: Vec<PathBuf>,

    /// Selector patterns identifying which flows to include.
    #[arg(long = "flow", alias = "flows", value_delimiter = ',')]
    pub flow: Vec<String>,

    /// Maximum propagation depth for the flow-graph builder.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Number of compilations to build concurrently.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Path to write the composed graph's JSON dump.
    #[arg(long)]
    pub dump_graph: Option<PathBuf>,

    /// Directory to write per-run output artifacts into.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_a_value_option_with_nothing_after_it() {
        let args = vec!["--workspace".to_string()];
        assert_eq!(find_missing_value(&args), Some("--workspace"));
    }

    #[test]
    fn flags_a_value_option_immediately_followed_by_another_option() {
        let args = vec!["--dump-graph".to_string(), "--output-dir".to_string(), "out".to_string()];
        assert_eq!(find_missing_value(&args), Some("--dump-graph"));
    }

    #[test]
    fn accepts_equals_form_and_well_formed_options() {
        let args = vec!["--workspace=.".to_string(), "--max-depth".to_string(), "5".to_string()];
        assert_eq!(find_missing_value(&args), None);
    }
}
