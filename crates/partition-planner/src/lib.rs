// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-planner
//!
//! Splits a job graph into capacity-bounded partitions by walking backwards
//! from a sink job, using pluggable boundary policies.
//!
//! # Policies
//!
//! | Policy | Defers | Groups | Forces boundaries |
//! |---|---|---|---|
//! | [`Greedy`] | never | no | no |
//! | [`FanOutDeferral`] | jobs with > N children until all are classified | no | no |
//! | [`FanInFlush`] | never | no | after jobs with > N parents |
//! | [`DescendantClosure`] | never | pending descendants | no |
//!
//! On top of any policy, [`ChildOrdering::Strict`] holds a job back until
//! its in-scope children are classified, which keeps the partitions in
//! dependency order. [`Greedy`] and [`FanInFlush`] run strict by default.
//! [`FanOutDeferral`] and [`DescendantClosure`] act on jobs whose children
//! are still pending, so they default to [`ChildOrdering::Relaxed`]. See
//! [`BoundaryPolicy::preferred_ordering`].
//!
//! # Trait-Based Extensibility
//!
//! All policies implement [`BoundaryPolicy`], so new ones can be added
//! without touching the engine:
//!
//! ```ignore
//! struct NeverSplitHeavyJobs;
//! impl<C> BoundaryPolicy<C> for NeverSplitHeavyJobs {
//!     fn name(&self) -> &str { "never-split-heavy" }
//!     fn group(&self, job: &str, view: &PolicyView<'_, C>) -> Vec<String> { /* ... */ }
//! }
//! ```
//!
//! Job sizes come from a [`SizeOracle`]; any `Fn(&str, &Partition) -> f64`
//! is one.

pub mod engine;
mod error;
pub mod oracle;
pub(crate) mod plan;
pub mod strategy;

pub use engine::{BackwardPartitioner, ChildOrdering, OversizePolicy};
pub use error::PartitionError;
pub use oracle::{FixedSizes, SizeOracle, UniformSize};
pub use plan::{EngineStats, PartitionOutcome};
pub use strategy::closure::DescendantClosure;
pub use strategy::fan_in::{FanInFlush, DEFAULT_FAN_IN_THRESHOLD};
pub use strategy::fan_out::{FanOutDeferral, DEFAULT_FAN_OUT_THRESHOLD};
pub use strategy::greedy::Greedy;
pub use strategy::{BoundaryPolicy, PolicyKind, PolicyView};
