// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `wf-partition partition` command: plan a workflow across sites.

use anyhow::Context;
use partition_planner::PolicyKind;
use std::path::PathBuf;
use workflow_planner::{PlannerConfig, PlannerError};

pub fn execute(
    workflow: PathBuf,
    config: Option<PathBuf>,
    policy: Option<PolicyKind>,
    sink: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let workflow = super::load_workflow(&workflow)?;

    let mut cfg = match &config {
        Some(path) => PlannerConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => {
            tracing::warn!("no --config given; using defaults, which configure no sites");
            PlannerConfig::default()
        }
    };
    if let Some(policy) = policy {
        cfg.policy = policy;
    }
    if sink.is_some() {
        cfg.sink = sink;
    }

    let report = match workflow_planner::plan(&workflow, &cfg) {
        Ok(report) => report,
        Err(PlannerError::Partition(e)) => {
            if let Some(partial) = e.partial() {
                eprintln!("Partitions closed before the failure:");
                for p in partial {
                    eprintln!(
                        "  [{}] {:.2}/{:.2}: {}",
                        p.id(),
                        p.accumulated(),
                        p.capacity(),
                        p.members().collect::<Vec<_>>().join(", ")
                    );
                }
            }
            return Err(e).context("partitioning failed");
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    super::banner("Partition Plan");
    print!("{}", report.summary());
    println!();
    for p in &report.partitions {
        println!("  Partition {} ({}):", p.id, p.site.as_deref().unwrap_or("-"));
        println!("    {}", p.jobs.join(", "));
    }
    println!();
    Ok(())
}
