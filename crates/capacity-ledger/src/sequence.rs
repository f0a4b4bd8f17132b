// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The ordered list of capacities a run consumes.

use crate::{LedgerError, SiteCapacity};

/// A non-empty, ordered sequence of site capacities.
///
/// Partition *k* of a run is bounded by the capacity at the ledger's cursor
/// when it was opened; the sequence itself never changes once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacitySequence {
    capacities: Vec<SiteCapacity>,
}

impl CapacitySequence {
    /// Wraps already-validated capacities.
    pub fn new(capacities: Vec<SiteCapacity>) -> Result<Self, LedgerError> {
        if capacities.is_empty() {
            return Err(LedgerError::EmptyConfiguration);
        }
        Ok(Self { capacities })
    }

    /// Validates raw values and builds a sequence from them.
    pub fn from_values<I>(values: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = f64>,
    {
        let capacities = values
            .into_iter()
            .map(SiteCapacity::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(capacities)
    }

    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SiteCapacity> {
        self.capacities.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = SiteCapacity> + '_ {
        self.capacities.iter().copied()
    }

    /// Sum of every capacity.
    pub fn total(&self) -> f64 {
        self.capacities.iter().map(SiteCapacity::value).sum()
    }

    /// The largest single capacity.
    pub fn largest(&self) -> f64 {
        self.capacities
            .iter()
            .map(SiteCapacity::value)
            .fold(0.0, f64::max)
    }

    /// The largest capacity at or after `index`, or `None` past the end.
    pub fn largest_from(&self, index: usize) -> Option<f64> {
        self.capacities
            .get(index..)?
            .iter()
            .map(SiteCapacity::value)
            .reduce(f64::max)
    }
}
