// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations.

pub mod inspect;
pub mod levels;
pub mod partition;

use anyhow::Context;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use workflow_planner::Workflow;

/// Installs the global subscriber. `RUST_LOG` wins when no `-v` is given.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_workflow(path: &Path) -> anyhow::Result<Workflow> {
    Workflow::from_file(path)
        .with_context(|| format!("failed to load workflow from '{}'", path.display()))
}

fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║{:^54}║", format!("wf-partition · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
