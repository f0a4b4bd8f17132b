// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partition engine.

use capacity_ledger::{LedgerError, Partition};
use workflow_graph::{ColorError, GraphError};

/// Errors that can end a partitioning run.
///
/// None of these are retried internally. A failed run is restarted from
/// scratch by building a new engine.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// The sink, or an id referenced by an edge, does not exist.
    #[error("unknown node '{id}'")]
    UnknownNode { id: String },

    /// The capacity configuration is unusable (empty or non-positive).
    #[error("invalid capacity configuration: {0}")]
    Configuration(LedgerError),

    /// The site cursor ran past the last capacity before every job was
    /// classified. `partial` holds the partitions closed so far.
    #[error("capacity exhausted: all {sites} site(s) used after {} partition(s)", partial.len())]
    CapacityExhausted {
        sites: usize,
        partial: Vec<Partition>,
    },

    /// A job is larger than every capacity still ahead of the site cursor.
    /// `capacity` is the largest of them.
    #[error("job '{job}' needs {size} but no remaining site holds more than {capacity}")]
    OversizedJob {
        job: String,
        size: f64,
        capacity: f64,
    },

    /// The graph is not a DAG over the sink's ancestors, or the traversal
    /// failed to terminate or to classify every job.
    #[error("malformed graph: {detail}")]
    MalformedGraph { detail: String },

    /// The size oracle returned a negative or non-finite size.
    #[error("size oracle returned {size} for job '{job}'")]
    InvalidSize { job: String, size: f64 },

    /// A finished outcome failed re-validation.
    #[error("invalid partition outcome from policy '{policy}': {detail}")]
    InvalidOutcome { policy: String, detail: String },

    /// Any other graph error.
    #[error("graph error: {0}")]
    Graph(GraphError),

    /// Any other ledger error.
    #[error("ledger error: {0}")]
    Ledger(LedgerError),
}

impl PartitionError {
    /// Partitions produced before the run failed, if the error carries any.
    pub fn partial(&self) -> Option<&[Partition]> {
        match self {
            Self::CapacityExhausted { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

impl From<GraphError> for PartitionError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::UnknownNode { id } => Self::UnknownNode { id },
            GraphError::Cycle { parent, child } => Self::MalformedGraph {
                detail: format!("cycle through edge '{parent}' -> '{child}'"),
            },
            other => Self::Graph(other),
        }
    }
}

impl From<LedgerError> for PartitionError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::EmptyConfiguration
            | LedgerError::InvalidCapacity { .. }
            | LedgerError::Parse { .. } => Self::Configuration(e),
            LedgerError::InvalidSize { job, size } => Self::InvalidSize { job, size },
            other => Self::Ledger(other),
        }
    }
}

impl From<ColorError> for PartitionError {
    fn from(e: ColorError) -> Self {
        Self::MalformedGraph {
            detail: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_errors_are_routed() {
        let e: PartitionError = GraphError::UnknownNode { id: "x".into() }.into();
        assert!(matches!(e, PartitionError::UnknownNode { ref id } if id == "x"));

        let e: PartitionError = GraphError::Cycle {
            parent: "a".into(),
            child: "b".into(),
        }
        .into();
        assert!(matches!(e, PartitionError::MalformedGraph { .. }));
    }

    #[test]
    fn test_ledger_errors_are_routed() {
        let e: PartitionError = LedgerError::EmptyConfiguration.into();
        assert!(matches!(e, PartitionError::Configuration(_)));

        let e: PartitionError = LedgerError::EmptyPartition { partition: 0 }.into();
        assert!(matches!(e, PartitionError::Ledger(_)));
        assert!(e.partial().is_none());
    }

    #[test]
    fn test_exhausted_message_counts_partials() {
        let e = PartitionError::CapacityExhausted {
            sites: 1,
            partial: Vec::new(),
        };
        assert_eq!(
            e.to_string(),
            "capacity exhausted: all 1 site(s) used after 0 partition(s)"
        );
    }
}
