// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for capacity parsing and partition accounting.

/// Errors that can occur while building capacities or charging partitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// No capacities were supplied.
    #[error("capacity sequence is empty: at least one site capacity is required")]
    EmptyConfiguration,

    /// A capacity was zero, negative, or not a finite number.
    #[error("invalid capacity {value}: capacities must be finite and greater than zero")]
    InvalidCapacity { value: f64 },

    /// A capacity string could not be parsed.
    #[error("invalid capacity string '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// A size charged against a partition was negative or NaN.
    #[error("invalid size {size} for job '{job}'")]
    InvalidSize { job: String, size: f64 },

    /// The job already belongs to a partition.
    #[error("job '{job}' is already assigned to partition {partition}")]
    AlreadyAssigned { job: String, partition: usize },

    /// Closing an empty partition would produce a meaningless result entry.
    #[error("partition {partition} is empty and cannot be closed")]
    EmptyPartition { partition: usize },

    /// Only an empty partition can be moved to another site.
    #[error("partition {partition} already has members and cannot change site")]
    NotEmpty { partition: usize },

    /// Every capacity in the sequence has been used up.
    #[error("capacities exhausted: all {sites} site(s) have been consumed")]
    Exhausted { sites: usize },
}
