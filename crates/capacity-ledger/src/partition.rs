// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A single partition: an ordered group of jobs charged against one site.

use indexmap::IndexSet;

/// An ordered set of job ids plus the size accumulated by adding them.
///
/// Members are kept in commit order. A partition is only built by the
/// [`crate::PartitionLedger`], which guarantees each job appears in exactly
/// one partition.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Partition {
    id: usize,
    members: IndexSet<String>,
    accumulated: f64,
    capacity: f64,
    site_index: usize,
    overflowed: bool,
}

impl Partition {
    pub(crate) fn open(id: usize, capacity: f64, site_index: usize) -> Self {
        Self {
            id,
            members: IndexSet::new(),
            accumulated: 0.0,
            capacity,
            site_index,
            overflowed: false,
        }
    }

    /// Adds a job and charges `delta` to the partition.
    pub(crate) fn insert(&mut self, job: &str, delta: f64) -> bool {
        if !self.members.insert(job.to_string()) {
            return false;
        }
        self.accumulated += delta;
        if self.accumulated > self.capacity {
            self.overflowed = true;
        }
        true
    }

    /// Sequential id, assigned in closing order starting at zero.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Member ids in the order they were committed.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn contains(&self, job: &str) -> bool {
        self.members.contains(job)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// The capacity in force when this partition was opened.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Index into the capacity sequence this partition was charged against.
    pub fn site_index(&self) -> usize {
        self.site_index
    }

    /// Capacity left before the bound is reached (negative once overflowed).
    pub fn headroom(&self) -> f64 {
        self.capacity - self.accumulated
    }

    /// Fraction of the capacity used, in `[0.0, ∞)`.
    pub fn utilisation(&self) -> f64 {
        self.accumulated / self.capacity
    }

    /// `true` if the partition holds more than its capacity. Only a forced
    /// commit (an oversized singleton or a flushed fan-in node) can do this.
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }
}
