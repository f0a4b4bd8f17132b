// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition outcome: the output of the backward partitioner.
//!
//! An outcome is an ordered list of [`Partition`]s plus the job → partition
//! assignment. Partition `k` holds jobs that finished no earlier than the
//! jobs in partition `k + 1`: the engine walks from the sink towards the
//! sources, so the *last* partition is the one to run first.

use crate::engine::ChildOrdering;
use crate::PartitionError;
use capacity_ledger::{LedgerStats, Partition};
use std::collections::HashMap;
use workflow_graph::Graph;

/// Counters kept by the engine during one run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct EngineStats {
    /// Main-loop iterations, including pops of already-black duplicates.
    pub iterations: usize,
    /// The iteration budget the run was held to.
    pub iteration_budget: usize,
    /// Jobs put back to white by the ordering guard or the policy.
    pub deferrals: usize,
    /// Jobs committed to a partition.
    pub classified: usize,
    /// Boundaries forced by the policy after a commit.
    pub forced_flushes: usize,
    /// Jobs admitted alone into an over-capacity partition.
    pub oversized_admissions: usize,
}

/// The complete result of a successful run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartitionOutcome {
    /// Policy that produced this outcome.
    pub policy: String,
    /// The job the traversal started from.
    pub sink: String,
    pub ordering: ChildOrdering,
    /// Partitions in closing order; `partitions[k].id() == k`.
    pub partitions: Vec<Partition>,
    /// Job id → partition id, total over the sink's ancestors.
    pub assignment: HashMap<String, usize>,
    /// First-discovery distance from the sink.
    pub depths: HashMap<String, usize>,
    pub stats: EngineStats,
    pub ledger: LedgerStats,
}

impl PartitionOutcome {
    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Total number of classified jobs.
    pub fn total_jobs(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    pub fn partition(&self, id: usize) -> Option<&Partition> {
        self.partitions.get(id)
    }

    pub fn partition_of(&self, job: &str) -> Option<usize> {
        self.assignment.get(job).copied()
    }

    /// Member ids of every partition, in order.
    pub fn members(&self) -> Vec<Vec<&str>> {
        self.partitions
            .iter()
            .map(|p| p.members().collect())
            .collect()
    }

    /// Largest accumulated size over all partitions.
    pub fn peak_accumulated(&self) -> f64 {
        self.partitions
            .iter()
            .map(Partition::accumulated)
            .fold(0.0, f64::max)
    }

    /// Re-checks the outcome against the graph it was computed on.
    ///
    /// Checks:
    /// - Partition ids are consecutive from 0 and no partition is empty.
    /// - Every job upstream of the sink is assigned exactly once, and
    ///   nothing else is assigned.
    /// - Over-capacity partitions are accounted for by forced boundaries or
    ///   oversized admissions.
    /// - Under [`ChildOrdering::Strict`], for every edge `parent → child`
    ///   `assignment[parent] >= assignment[child]`.
    pub fn validate<C>(&self, graph: &Graph<C>) -> Result<(), PartitionError> {
        let fail = |detail: String| PartitionError::InvalidOutcome {
            policy: self.policy.clone(),
            detail,
        };

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (expected, partition) in self.partitions.iter().enumerate() {
            if partition.id() != expected {
                return Err(fail(format!(
                    "expected partition id {expected}, got {}",
                    partition.id()
                )));
            }
            if partition.is_empty() {
                return Err(fail(format!("partition {expected} is empty")));
            }
            for job in partition.members() {
                if let Some(previous) = seen.insert(job, expected) {
                    return Err(fail(format!(
                        "job '{job}' appears in partitions {previous} and {expected}"
                    )));
                }
                if self.partition_of(job) != Some(expected) {
                    return Err(fail(format!(
                        "assignment of '{job}' disagrees with partition {expected}"
                    )));
                }
            }
        }

        let scope = graph.upstream_of(&self.sink)?;
        if let Some(job) = scope.iter().find(|job| !seen.contains_key(**job)) {
            return Err(fail(format!("job '{job}' was never assigned")));
        }
        if seen.len() != scope.len() || self.assignment.len() != scope.len() {
            return Err(fail(format!(
                "{} jobs assigned but {} are upstream of '{}'",
                self.assignment.len(),
                scope.len(),
                self.sink
            )));
        }

        let overflowed = self.partitions.iter().filter(|p| p.is_overflowed()).count();
        if overflowed > self.stats.forced_flushes + self.stats.oversized_admissions {
            return Err(fail(format!(
                "{overflowed} partitions exceed their capacity without a forced boundary"
            )));
        }

        if self.ordering == ChildOrdering::Strict {
            for job in &scope {
                let Some(&child_partition) = seen.get(job) else {
                    continue;
                };
                for parent in graph.parents_of(job).unwrap_or_default() {
                    let Some(&parent_partition) = seen.get(parent.as_str()) else {
                        continue;
                    };
                    if parent_partition < child_partition {
                        return Err(fail(format!(
                            "parent '{parent}' in partition {parent_partition} precedes \
                             child '{job}' in partition {child_partition}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns a human-readable summary of the outcome.
    pub fn summary(&self) -> String {
        let sizes: Vec<usize> = self.partitions.iter().map(Partition::len).collect();
        let peak = self
            .partitions
            .iter()
            .max_by(|a, b| a.utilisation().total_cmp(&b.utilisation()));
        let (peak_acc, peak_cap) = peak.map_or((0.0, 0.0), |p| (p.accumulated(), p.capacity()));
        let peak_pct = if peak_cap > 0.0 {
            peak_acc / peak_cap * 100.0
        } else {
            0.0
        };

        format!(
            "Partitioning '{}' from '{}': {} partitions, {} jobs, \
             fullest {:.2}/{:.2} ({:.0}%), {} deferrals, {} flushes, \
             {} iterations, partition sizes: {:?}",
            self.policy,
            self.sink,
            self.num_partitions(),
            self.total_jobs(),
            peak_acc,
            peak_cap,
            peak_pct,
            self.stats.deferrals,
            self.stats.forced_flushes,
            self.stats.iterations,
            sizes,
        )
    }
}
