// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Ledger statistics for diagnostics.

/// Cumulative counters kept by a [`crate::PartitionLedger`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct LedgerStats {
    /// Jobs committed.
    pub commits: u64,
    /// Partitions closed (including the final one handed out by `finish`).
    pub partitions_closed: u64,
    /// Closes triggered by a flush rather than by a capacity check.
    pub forced_flushes: u64,
    /// Closed partitions whose accumulated size exceeds their capacity.
    pub overflowed_partitions: u64,
    /// Capacities the cursor has moved onto, counting the first.
    pub sites_consumed: u64,
    /// Sites passed over because they could not hold the next job.
    pub sites_skipped: u64,
    /// Largest accumulated size seen in any partition.
    pub peak_accumulated: f64,
    /// Sum of every committed delta.
    pub total_charged: f64,
}

impl LedgerStats {
    pub(crate) fn record_commit(&mut self, delta: f64, accumulated: f64) {
        self.commits += 1;
        self.total_charged += delta;
        if accumulated > self.peak_accumulated {
            self.peak_accumulated = accumulated;
        }
    }

    pub(crate) fn record_close(&mut self, overflowed: bool) {
        self.partitions_closed += 1;
        if overflowed {
            self.overflowed_partitions += 1;
        }
    }

    /// Mean jobs per closed partition. `0.0` before anything is closed.
    pub fn mean_partition_size(&self) -> f64 {
        if self.partitions_closed == 0 {
            return 0.0;
        }
        self.commits as f64 / self.partitions_closed as f64
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Ledger: {} commits into {} partitions ({:.1} jobs each), \
             {} sites consumed, {} flushes, {} overflowed, peak {:.2}",
            self.commits,
            self.partitions_closed,
            self.mean_partition_size(),
            self.sites_consumed,
            self.forced_flushes,
            self.overflowed_partitions,
            self.peak_accumulated,
        )
    }
}
