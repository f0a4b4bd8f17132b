// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # wf-partition
//!
//! Command-line interface for the backward workflow partitioner.
//!
//! ## Usage
//! ```bash
//! # Partition a workflow across the sites in a config file
//! wf-partition partition --workflow montage.json --config sites.toml
//!
//! # Override the policy and sink, print JSON
//! wf-partition partition --workflow montage.json -c sites.toml --policy fan-out --sink mAdd --json
//!
//! # Inspect workflow structure
//! wf-partition inspect --workflow montage.json
//!
//! # List jobs level by level, from the leaves up
//! wf-partition levels --workflow montage.json --bottom-up
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wf-partition",
    about = "Capacity-bounded partitioning of scientific workflows",
    version,
    author
)]
struct Cli {
    /// Path to a TOML planner configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a workflow and print the plan.
    Partition {
        /// Path to the workflow JSON document.
        #[arg(short, long)]
        workflow: PathBuf,

        /// Boundary policy: greedy, fan-out, fan-in, closure (overrides the config).
        #[arg(short, long)]
        policy: Option<partition_planner::PolicyKind>,

        /// Job to partition backwards from (defaults to the rear job).
        #[arg(short, long)]
        sink: Option<String>,

        /// Print the plan as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Inspect a workflow: jobs, edges, roots, leaves and cycles.
    Inspect {
        /// Path to the workflow JSON document.
        #[arg(short, long)]
        workflow: PathBuf,
    },

    /// List the jobs of a workflow level by level.
    Levels {
        /// Path to the workflow JSON document.
        #[arg(short, long)]
        workflow: PathBuf,

        /// Start at the leaves instead of the roots.
        #[arg(long)]
        bottom_up: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Partition {
            workflow,
            policy,
            sink,
            json,
        } => commands::partition::execute(workflow, cli.config, policy, sink, json),
        Commands::Inspect { workflow } => commands::inspect::execute(workflow),
        Commands::Levels {
            workflow,
            bottom_up,
        } => commands::levels::execute(workflow, bottom_up),
    }
}
