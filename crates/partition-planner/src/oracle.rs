// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact-size oracles.
//!
//! The engine never knows what a job "weighs". It asks a [`SizeOracle`] for
//! the *marginal* size of a job given the partition it would join, which
//! lets an oracle skip artifacts already charged to that partition.

use capacity_ledger::Partition;
use std::collections::HashMap;

/// Supplies the marginal size of a job for an in-progress partition.
pub trait SizeOracle {
    /// Size `job` would add to `partition`. Must be finite and `>= 0`.
    fn size_of(&self, job: &str, partition: &Partition) -> f64;

    /// Size a whole group would add to `partition` when committed together.
    ///
    /// The default sums [`size_of`](Self::size_of); oracles that share
    /// artifacts between jobs override it to count each artifact once.
    fn group_size(&self, jobs: &[String], partition: &Partition) -> f64 {
        jobs.iter().map(|job| self.size_of(job, partition)).sum()
    }
}

impl<F> SizeOracle for F
where
    F: Fn(&str, &Partition) -> f64,
{
    fn size_of(&self, job: &str, partition: &Partition) -> f64 {
        self(job, partition)
    }
}

/// Every job has the same size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSize(pub f64);

impl SizeOracle for UniformSize {
    fn size_of(&self, _job: &str, _partition: &Partition) -> f64 {
        self.0
    }
}

/// Fixed per-job sizes. Jobs missing from the table weigh nothing.
#[derive(Debug, Clone, Default)]
pub struct FixedSizes {
    sizes: HashMap<String, f64>,
}

impl FixedSizes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, job: impl Into<String>, size: f64) {
        self.sizes.insert(job.into(), size);
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FixedSizes {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            sizes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl SizeOracle for FixedSizes {
    fn size_of(&self, job: &str, _partition: &Partition) -> f64 {
        self.sizes.get(job).copied().unwrap_or(0.0)
    }
}
