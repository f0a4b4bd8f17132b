// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # workflow-planner
//!
//! Turns a workflow document and a site configuration into a partition plan.
//!
//! The planner takes:
//! - A [`Workflow`] (JSON) whose jobs become a `Graph<JobHandle>`.
//! - A [`PlannerConfig`] (TOML) naming the sink, the boundary policy and the
//!   execution sites.
//!
//! And runs the backward partitioner with a [`FileSizeOracle`], labelling
//! each partition with its site and deriving the dependencies between the
//! resulting sub-workflows:
//!
//! ```text
//! Workflow ──► Graph ──┐
//!                      ├──► BackwardPartitioner ──► PartitionOutcome
//! PlannerConfig ──► ResolvedSites                          │
//!                                                          ▼
//!                                   SubWorkflows ──► PlanReport
//! ```

mod config;
mod error;
pub mod oracle;
pub mod report;
pub mod sites;
pub mod subworkflow;
pub mod workflow;

pub use config::PlannerConfig;
pub use error::PlannerError;
pub use oracle::FileSizeOracle;
pub use report::{PartitionReport, PlanReport};
pub use sites::{ResolvedSites, SiteConfig, LOCAL_SITE};
pub use subworkflow::{PartitionDependency, SubWorkflows};
pub use workflow::{rear_job, FileUse, JobHandle, JobSpec, LinkKind, Workflow};

use partition_planner::BackwardPartitioner;

/// Plans `workflow` under `config`.
///
/// The sink is `config.sink` if set, otherwise the workflow's
/// [rear job](rear_job). The outcome is re-validated against the graph
/// before the report is built.
pub fn plan(workflow: &Workflow, config: &PlannerConfig) -> Result<PlanReport, PlannerError> {
    let graph = workflow.to_graph()?;
    let sink = match &config.sink {
        Some(sink) => sink.clone(),
        None => rear_job(&graph).ok_or(PlannerError::NoSink)?.to_string(),
    };
    let sites = config.capacities()?;

    tracing::info!(
        workflow = %workflow.name,
        sink = %sink,
        policy = ?config.policy,
        sites = sites.len(),
        "planning workflow"
    );

    let mut engine = BackwardPartitioner::new(
        &graph,
        &sink,
        sites.capacities().clone(),
        FileSizeOracle::from_workflow(workflow),
    )?
    .with_policy(config.create_policy::<JobHandle>())
    .with_oversize(config.oversize);
    if let Some(ordering) = config.ordering {
        engine = engine.with_ordering(ordering);
    }
    if let Some(budget) = config.iteration_budget {
        engine = engine.with_iteration_budget(budget);
    }

    let outcome = engine.partition()?;
    outcome.validate(&graph)?;
    tracing::info!("{}", outcome.summary());

    let subs = SubWorkflows::derive(&graph, &outcome);
    Ok(PlanReport::new(&workflow.name, &sites, &outcome, &subs))
}
