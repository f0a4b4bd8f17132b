// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`BoundaryPolicy`] trait and policy implementations.
//!
//! A policy is consulted by the engine at three points for every job it
//! pops off the stack:
//!
//! ```text
//! pop job ──► should_defer? ──yes──► un-discover, try again later
//!                 │ no
//!                 ▼
//!             group(job) ──► size check / commit
//!                                  │
//!                                  ▼
//!                            flush_after? ──yes──► close partition before
//!                                                  the next commit
//! ```
//!
//! Policies only read state through a [`PolicyView`]; they never mutate the
//! traversal.

pub mod closure;
pub mod fan_in;
pub mod fan_out;
pub mod greedy;

use crate::engine::ChildOrdering;
use std::collections::HashSet;
use workflow_graph::{Color, Graph, TraversalState};

/// Read-only view of a running traversal, handed to policies.
pub struct PolicyView<'a, C> {
    graph: &'a Graph<C>,
    state: &'a TraversalState,
    scope: &'a HashSet<String>,
}

impl<C> Clone for PolicyView<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for PolicyView<'_, C> {}

impl<'a, C> PolicyView<'a, C> {
    pub fn new(graph: &'a Graph<C>, state: &'a TraversalState, scope: &'a HashSet<String>) -> Self {
        Self {
            graph,
            state,
            scope,
        }
    }

    pub fn graph(&self) -> &'a Graph<C> {
        self.graph
    }

    pub fn color(&self, job: &str) -> Color {
        self.state.color(job)
    }

    /// First-discovery distance from the sink.
    pub fn depth(&self, job: &str) -> Option<usize> {
        self.state.depth(job)
    }

    /// `true` if `job` is upstream of (or is) the sink.
    pub fn in_scope(&self, job: &str) -> bool {
        self.scope.contains(job)
    }

    /// Number of parents of `job`, in or out of scope.
    pub fn in_degree(&self, job: &str) -> usize {
        self.graph.parents_of(job).map_or(0, <[String]>::len)
    }

    /// Number of children of `job`, in or out of scope.
    pub fn out_degree(&self, job: &str) -> usize {
        self.graph.children_of(job).map_or(0, <[String]>::len)
    }

    /// Children of `job` that are upstream of the sink.
    pub fn scoped_children(&self, job: &str) -> impl Iterator<Item = &'a str> + 'a {
        let scope = self.scope;
        self.graph
            .children_of(job)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(move |c| scope.contains(*c))
    }

    /// `true` once every in-scope child of `job` is black.
    pub fn children_classified(&self, job: &str) -> bool {
        self.scoped_children(job)
            .all(|c| self.state.is(c, Color::Black))
    }
}

/// Decides when a job may be classified and what goes with it.
///
/// Every method has a default that yields the plain greedy behaviour, so a
/// policy only overrides the decision it cares about.
pub trait BoundaryPolicy<C>: Send + Sync {
    /// Human-readable name of this policy.
    fn name(&self) -> &str;

    /// Returns `true` to put `job` back to white instead of classifying it
    /// now. It will be re-queued when another child of it is classified.
    fn should_defer(&self, _job: &str, _view: &PolicyView<'_, C>) -> bool {
        false
    }

    /// The jobs to classify atomically with `job`, `job` first.
    fn group(&self, job: &str, _view: &PolicyView<'_, C>) -> Vec<String> {
        vec![job.to_string()]
    }

    /// Returns `true` to close the current partition right after `job`.
    fn flush_after(&self, _job: &str, _view: &PolicyView<'_, C>) -> bool {
        false
    }

    /// Ordering the engine uses unless the caller overrides it.
    ///
    /// Policies that decide something about jobs whose children are still
    /// pending return [`ChildOrdering::Relaxed`]; under strict ordering no
    /// such job ever reaches them.
    fn preferred_ordering(&self) -> ChildOrdering {
        ChildOrdering::Strict
    }
}

impl<C, P> BoundaryPolicy<C> for Box<P>
where
    P: BoundaryPolicy<C> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn should_defer(&self, job: &str, view: &PolicyView<'_, C>) -> bool {
        (**self).should_defer(job, view)
    }

    fn group(&self, job: &str, view: &PolicyView<'_, C>) -> Vec<String> {
        (**self).group(job, view)
    }

    fn flush_after(&self, job: &str, view: &PolicyView<'_, C>) -> bool {
        (**self).flush_after(job, view)
    }

    fn preferred_ordering(&self) -> ChildOrdering {
        (**self).preferred_ordering()
    }
}

/// Named policy selector, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    Greedy,
    FanOut,
    FanIn,
    Closure,
}

impl PolicyKind {
    /// Builds the policy. Thresholds are ignored by policies that have none.
    pub fn build<C>(self, fan_out_threshold: usize, fan_in_threshold: usize) -> Box<dyn BoundaryPolicy<C>> {
        match self {
            Self::Greedy => Box::new(greedy::Greedy),
            Self::FanOut => Box::new(fan_out::FanOutDeferral::new(fan_out_threshold)),
            Self::FanIn => Box::new(fan_in::FanInFlush::new(fan_in_threshold)),
            Self::Closure => Box::new(closure::DescendantClosure),
        }
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "fan-out" | "fanout" => Ok(Self::FanOut),
            "fan-in" | "fanin" => Ok(Self::FanIn),
            "closure" => Ok(Self::Closure),
            other => Err(format!(
                "unknown policy '{other}' (expected greedy, fan-out, fan-in or closure)"
            )),
        }
    }
}
