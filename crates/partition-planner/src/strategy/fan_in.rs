// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Large fan-in flush policy.
//!
//! A job with more than `threshold` parents is a natural cut: everything
//! above it fans into it. The job is committed to the current partition
//! like any other, and the partition is then closed before the next commit
//! so that its many parents start a fresh one.
//!
//! The close advances the site cursor if another capacity remains,
//! otherwise the next partition reopens under the same capacity.

use crate::strategy::{BoundaryPolicy, PolicyView};

/// Default parent count above which a job forces a partition boundary.
pub const DEFAULT_FAN_IN_THRESHOLD: usize = 10;

/// Forces a partition boundary after every large fan-in job.
#[derive(Debug, Clone, Copy)]
pub struct FanInFlush {
    threshold: usize,
}

impl Default for FanInFlush {
    fn default() -> Self {
        Self::new(DEFAULT_FAN_IN_THRESHOLD)
    }
}

impl FanInFlush {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl<C> BoundaryPolicy<C> for FanInFlush {
    fn name(&self) -> &str {
        "fan-in-flush"
    }

    fn flush_after(&self, job: &str, view: &PolicyView<'_, C>) -> bool {
        view.in_degree(job) > self.threshold
    }
}
