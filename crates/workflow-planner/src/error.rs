// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the workflow planner.

use std::path::PathBuf;

/// Errors that can occur while loading inputs or planning a workflow.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// A workflow or config file could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workflow document is not valid JSON for the expected schema.
    #[error("workflow parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Two jobs in the workflow share an id.
    #[error("duplicate job id '{id}' in workflow")]
    DuplicateJob { id: String },

    /// No sink was configured and none could be derived from the workflow.
    #[error("no sink job: the workflow is empty or its rear job cannot be found")]
    NoSink,

    /// Graph construction failed.
    #[error("graph error: {0}")]
    Graph(#[from] workflow_graph::GraphError),

    /// A site capacity is unusable.
    #[error("site error: {0}")]
    Site(#[from] capacity_ledger::LedgerError),

    /// The partitioner failed.
    #[error("partitioning failed: {0}")]
    Partition(#[from] partition_planner::PartitionError),
}
