// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The partition ledger.
//!
//! [`PartitionLedger`] owns the in-progress [`Partition`], the closed
//! partitions, the job → partition assignment and the cursor into the
//! [`CapacitySequence`]. It has no notion of graphs; the engine decides
//! *when* to close, the ledger only keeps the books straight.
//!
//! ```text
//!   cursor ─► [ c0 ][ c1 ][ c2 ]
//!               │     │
//!               │     └── current: Partition #1 (open, capacity c1)
//!               └──────── closed:  Partition #0 (capacity c0)
//! ```
//!
//! # Example
//! ```
//! use capacity_ledger::{CapacitySequence, PartitionLedger};
//!
//! let caps = CapacitySequence::from_values([100.0, 100.0]).unwrap();
//! let mut ledger = PartitionLedger::new(caps);
//!
//! ledger.commit("d", 40.0).unwrap();
//! ledger.commit("c", 40.0).unwrap();
//! assert!(ledger.would_exceed(40.0));
//!
//! ledger.close_and_advance().unwrap();
//! ledger.commit("b", 40.0).unwrap();
//!
//! let out = ledger.finish();
//! assert_eq!(out.partitions.len(), 2);
//! assert_eq!(out.assignment["b"], 1);
//! ```

use crate::{CapacitySequence, LedgerError, LedgerStats, Partition};
use std::collections::HashMap;
use tracing::{debug, info};

/// Everything the ledger produced, handed out by [`PartitionLedger::finish`].
#[derive(Debug, Clone)]
pub struct LedgerOutcome {
    /// Partitions in closing order; `partitions[k].id() == k`.
    pub partitions: Vec<Partition>,
    /// Job id → partition id.
    pub assignment: HashMap<String, usize>,
    pub stats: LedgerStats,
}

/// Bookkeeping for one partitioning run.
#[derive(Debug, Clone)]
pub struct PartitionLedger {
    capacities: CapacitySequence,
    cursor: usize,
    /// `None` once the cursor has run past the last capacity.
    current: Option<Partition>,
    closed: Vec<Partition>,
    assignment: HashMap<String, usize>,
    stats: LedgerStats,
}

impl PartitionLedger {
    /// Opens partition 0 under the first capacity.
    pub fn new(capacities: CapacitySequence) -> Self {
        let first = capacities.get(0).map(|c| c.value()).unwrap_or(0.0);
        let stats = LedgerStats {
            sites_consumed: 1,
            ..LedgerStats::default()
        };
        Self {
            capacities,
            cursor: 0,
            current: Some(Partition::open(0, first, 0)),
            closed: Vec::new(),
            assignment: HashMap::new(),
            stats,
        }
    }

    /// The open partition, or `None` after exhaustion.
    pub fn current(&self) -> Option<&Partition> {
        self.current.as_ref()
    }

    /// Size charged to the open partition so far.
    pub fn current_accumulated(&self) -> f64 {
        self.current.as_ref().map_or(0.0, Partition::accumulated)
    }

    /// `true` if the open partition has no members.
    pub fn current_is_empty(&self) -> bool {
        self.current.as_ref().map_or(true, Partition::is_empty)
    }

    /// Capacity of the open partition.
    pub fn capacity(&self) -> f64 {
        self.current.as_ref().map_or(0.0, Partition::capacity)
    }

    /// Position of the cursor in the capacity sequence.
    pub fn site_index(&self) -> usize {
        self.cursor
    }

    /// Capacities not yet reached by the cursor.
    pub fn remaining_sites(&self) -> usize {
        self.capacities.len().saturating_sub(self.cursor + 1)
    }

    /// Largest capacity the open partition can still be moved onto,
    /// including its own. `0.0` after exhaustion.
    pub fn largest_remaining(&self) -> f64 {
        if self.current.is_none() {
            return 0.0;
        }
        self.capacities.largest_from(self.cursor).unwrap_or(0.0)
    }

    pub fn capacities(&self) -> &CapacitySequence {
        &self.capacities
    }

    /// Returns `true` if charging `delta` would push the open partition past
    /// its capacity.
    pub fn would_exceed(&self, delta: f64) -> bool {
        match &self.current {
            Some(p) => p.accumulated() + delta > p.capacity(),
            None => true,
        }
    }

    /// Adds `job` to the open partition and charges `delta` to it.
    ///
    /// Never checks the capacity; callers ask [`would_exceed`](Self::would_exceed)
    /// first. Returns the id of the partition the job landed in.
    pub fn commit(&mut self, job: &str, delta: f64) -> Result<usize, LedgerError> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(LedgerError::InvalidSize {
                job: job.to_string(),
                size: delta,
            });
        }
        if let Some(&partition) = self.assignment.get(job) {
            return Err(LedgerError::AlreadyAssigned {
                job: job.to_string(),
                partition,
            });
        }
        let current = self.current.as_mut().ok_or(LedgerError::Exhausted {
            sites: self.capacities.len(),
        })?;

        current.insert(job, delta);
        let id = current.id();
        self.stats.record_commit(delta, current.accumulated());
        self.assignment.insert(job.to_string(), id);
        debug!(job, delta, partition = id, "committed");
        Ok(id)
    }

    /// Closes the open partition and moves the cursor to the next capacity.
    ///
    /// Fails with [`LedgerError::EmptyPartition`] if nothing was committed
    /// since the last close. If the cursor runs past the last capacity the
    /// closed partition is kept and [`LedgerError::Exhausted`] is returned;
    /// the ledger accepts no further commits after that.
    pub fn close_and_advance(&mut self) -> Result<(), LedgerError> {
        self.close_current()?;
        self.cursor += 1;
        match self.capacities.get(self.cursor) {
            Some(capacity) => {
                self.stats.sites_consumed += 1;
                self.current = Some(Partition::open(
                    self.closed.len(),
                    capacity.value(),
                    self.cursor,
                ));
                Ok(())
            }
            None => Err(LedgerError::Exhausted {
                sites: self.capacities.len(),
            }),
        }
    }

    /// Moves the open partition, which must still be empty, onto the next
    /// capacity. The partition keeps its id; the skipped site is never
    /// revisited.
    ///
    /// Fails with [`LedgerError::NotEmpty`] if something was committed, or
    /// [`LedgerError::Exhausted`] (leaving the ledger untouched) if there is
    /// no next capacity.
    pub fn skip_site(&mut self) -> Result<(), LedgerError> {
        let current = self.current.as_ref().ok_or(LedgerError::Exhausted {
            sites: self.capacities.len(),
        })?;
        if !current.is_empty() {
            return Err(LedgerError::NotEmpty {
                partition: current.id(),
            });
        }
        let id = current.id();
        let capacity = self
            .capacities
            .get(self.cursor + 1)
            .ok_or(LedgerError::Exhausted {
                sites: self.capacities.len(),
            })?;

        self.cursor += 1;
        self.stats.sites_consumed += 1;
        self.stats.sites_skipped += 1;
        self.current = Some(Partition::open(id, capacity.value(), self.cursor));
        debug!(partition = id, site = self.cursor, "skipped site");
        Ok(())
    }

    /// Closes the open partition regardless of how full it is.
    ///
    /// Advances to the next capacity if there is one, otherwise reopens
    /// under the current capacity. Returns `true` if the cursor moved.
    pub fn flush(&mut self) -> Result<bool, LedgerError> {
        self.close_current()?;
        self.stats.forced_flushes += 1;

        let advanced = self.cursor + 1 < self.capacities.len();
        if advanced {
            self.cursor += 1;
            self.stats.sites_consumed += 1;
        }
        let capacity = self
            .capacities
            .get(self.cursor)
            .map(|c| c.value())
            .unwrap_or(0.0);
        self.current = Some(Partition::open(self.closed.len(), capacity, self.cursor));
        debug!(advanced, site = self.cursor, "flushed partition");
        Ok(advanced)
    }

    fn close_current(&mut self) -> Result<(), LedgerError> {
        let current = self.current.as_ref().ok_or(LedgerError::Exhausted {
            sites: self.capacities.len(),
        })?;
        if current.is_empty() {
            return Err(LedgerError::EmptyPartition {
                partition: current.id(),
            });
        }
        if let Some(partition) = self.current.take() {
            self.seal(partition);
        }
        Ok(())
    }

    fn seal(&mut self, partition: Partition) {
        info!(
            partition = partition.id(),
            jobs = partition.len(),
            accumulated = partition.accumulated(),
            capacity = partition.capacity(),
            "partition closed"
        );
        self.stats.record_close(partition.is_overflowed());
        self.closed.push(partition);
    }

    /// Partition a job was committed to, if any.
    pub fn partition_of(&self, job: &str) -> Option<usize> {
        self.assignment.get(job).copied()
    }

    pub fn is_assigned(&self, job: &str) -> bool {
        self.assignment.contains_key(job)
    }

    pub fn assignment(&self) -> &HashMap<String, usize> {
        &self.assignment
    }

    /// Partitions closed so far.
    pub fn closed(&self) -> &[Partition] {
        &self.closed
    }

    pub fn stats(&self) -> &LedgerStats {
        &self.stats
    }

    /// Discards the open partition and returns only the closed ones, for
    /// reporting what was produced before a failure.
    pub fn into_closed(self) -> Vec<Partition> {
        self.closed
    }

    /// Closes the open partition if it has members and returns the books.
    pub fn finish(mut self) -> LedgerOutcome {
        if let Some(partition) = self.current.take() {
            if !partition.is_empty() {
                self.seal(partition);
            }
        }
        LedgerOutcome {
            partitions: self.closed,
            assignment: self.assignment,
            stats: self.stats,
        }
    }
}
