// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fan-out deferral policy.
//!
//! A job with more than `threshold` children is a fan-out point. Classifying
//! it while some of its children are still pending risks splitting the
//! cluster it feeds across partitions, so such a job is deferred until all
//! of its in-scope children are black:
//!
//! ```text
//!          p            p has 3 children (threshold 2):
//!        / | \          deferred until x, y and z are all black
//!       x  y  z
//! ```
//!
//! Children that are not upstream of the sink never turn black during the
//! run and are ignored by the check.
//!
//! Jobs at or below the threshold are classified as soon as they are
//! popped, so the policy runs under [`ChildOrdering::Relaxed`] unless the
//! caller asks otherwise.

use crate::engine::ChildOrdering;
use crate::strategy::{BoundaryPolicy, PolicyView};

/// Default child count above which a job is treated as a fan-out point.
pub const DEFAULT_FAN_OUT_THRESHOLD: usize = 2;

/// Defers fan-out jobs until every in-scope child is classified.
#[derive(Debug, Clone, Copy)]
pub struct FanOutDeferral {
    threshold: usize,
}

impl Default for FanOutDeferral {
    fn default() -> Self {
        Self::new(DEFAULT_FAN_OUT_THRESHOLD)
    }
}

impl FanOutDeferral {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl<C> BoundaryPolicy<C> for FanOutDeferral {
    fn name(&self) -> &str {
        "fan-out-deferral"
    }

    fn should_defer(&self, job: &str, view: &PolicyView<'_, C>) -> bool {
        view.out_degree(job) > self.threshold && !view.children_classified(job)
    }

    fn preferred_ordering(&self) -> ChildOrdering {
        ChildOrdering::Relaxed
    }
}
