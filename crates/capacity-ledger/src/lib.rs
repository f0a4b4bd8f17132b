// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # capacity-ledger
//!
//! Partition accounting for the backward partitioner: which jobs are in
//! which partition, how much each partition has been charged, and which
//! site capacity is currently in force.
//!
//! # Key Components
//!
//! - [`SiteCapacity`]: a positive size ceiling with human-readable parsing
//!   (`"512M"`, `"100G"`, raw numbers).
//! - [`CapacitySequence`]: the non-empty, ordered list of capacities a run
//!   consumes left to right.
//! - [`Partition`]: ordered members plus accumulated size and the capacity
//!   it was opened under.
//! - [`PartitionLedger`]: the open partition, the closed ones, the
//!   job → partition assignment and the site cursor.
//! - [`LedgerStats`]: commit/close/flush counters.

mod capacity;
mod error;
pub mod ledger;
mod partition;
mod sequence;
mod stats;

pub use capacity::{SiteCapacity, DEFAULT_SITE_SIZE_SCALE};
pub use error::LedgerError;
pub use ledger::{LedgerOutcome, PartitionLedger};
pub use partition::Partition;
pub use sequence::CapacitySequence;
pub use stats::LedgerStats;
