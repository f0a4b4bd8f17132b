// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Greedy boundary policy.
//!
//! Classifies every job the moment it is popped: no deferral, no grouping,
//! no forced boundaries. Partition boundaries fall wherever the next job
//! would overflow the current capacity.
//!
//! # When to use
//! - Default policy. Chains and trees where any cut is as good as another.

use crate::strategy::BoundaryPolicy;

/// Greedy: classify on first pop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl<C> BoundaryPolicy<C> for Greedy {
    fn name(&self) -> &str {
        "greedy"
    }
}
