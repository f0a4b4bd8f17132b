// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The backward capacity-bounded partitioner.
//!
//! Starting at a sink job, the engine walks parent edges with an explicit
//! LIFO stack (depth first), committing each job into the open partition
//! of a [`PartitionLedger`] and closing that partition whenever the next
//! job would push it past its capacity.
//!
//! # Lifecycle
//!
//! ```text
//! BackwardPartitioner::new(..)   READY
//!        │ partition(self)
//!        ▼
//!   TRAVERSING ──error──► PartitionError (engine consumed)
//!        │
//!        ▼
//!   PartitionOutcome             DONE
//! ```
//!
//! `partition` takes `self` by value, so an engine runs at most once. Colours
//! and depths live in a [`TraversalState`] owned by the run; the graph is
//! only borrowed and can be partitioned again by a fresh engine.
//!
//! # Main loop
//!
//! ```text
//! peek job
//!  ├─ black?                  pop (reached twice through a diamond)
//!  ├─ children pending /
//!  │  policy defers?          pop, gray → white
//!  └─ otherwise               settle owed boundary, size check,
//!                             commit group, push white parents
//! ```

use crate::oracle::SizeOracle;
use crate::plan::{EngineStats, PartitionOutcome};
use crate::strategy::greedy::Greedy;
use crate::strategy::{BoundaryPolicy, PolicyView};
use crate::PartitionError;
use capacity_ledger::{CapacitySequence, LedgerError, PartitionLedger};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use workflow_graph::{Color, Graph, GraphError, TraversalState};

/// Whether a job must wait for its in-scope children before it is
/// classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChildOrdering {
    /// A job is classified only once every in-scope child is black. Keeps
    /// `assignment[parent] >= assignment[child]` for every edge.
    #[default]
    Strict,
    /// Only the policy decides. A parent reached through one child may be
    /// classified before a sibling path reaches its other children.
    Relaxed,
}

/// What to do with a job larger than every remaining capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OversizePolicy {
    /// Abort with [`PartitionError::OversizedJob`].
    #[default]
    Fail,
    /// Admit the job alone into an over-capacity partition and close it.
    AllowSingleton,
}

/// Backward partitioner over a borrowed graph.
///
/// # Example
/// ```
/// use capacity_ledger::CapacitySequence;
/// use partition_planner::{BackwardPartitioner, UniformSize};
/// use workflow_graph::Graph;
///
/// // a → b → c → d, sink d.
/// let mut g: Graph = Graph::new();
/// for id in ["a", "b", "c", "d"] {
///     g.add_node(id, ());
/// }
/// g.add_edge("a", "b").unwrap();
/// g.add_edge("b", "c").unwrap();
/// g.add_edge("c", "d").unwrap();
///
/// let caps = CapacitySequence::from_values([100.0, 100.0]).unwrap();
/// let outcome = BackwardPartitioner::new(&g, "d", caps, UniformSize(40.0))
///     .unwrap()
///     .partition()
///     .unwrap();
///
/// assert_eq!(outcome.members(), vec![vec!["d", "c"], vec!["b", "a"]]);
/// ```
pub struct BackwardPartitioner<'g, C, O> {
    graph: &'g Graph<C>,
    sink: String,
    capacities: CapacitySequence,
    oracle: O,
    policy: Box<dyn BoundaryPolicy<C> + 'g>,
    ordering: Option<ChildOrdering>,
    oversize: OversizePolicy,
    iteration_budget: Option<usize>,
}

impl<'g, C, O: SizeOracle> BackwardPartitioner<'g, C, O> {
    /// Creates an engine in the READY state with the [`Greedy`] policy.
    ///
    /// Fails with [`PartitionError::UnknownNode`] if `sink` is not in the
    /// graph.
    pub fn new(
        graph: &'g Graph<C>,
        sink: &str,
        capacities: CapacitySequence,
        oracle: O,
    ) -> Result<Self, PartitionError> {
        graph.require(sink)?;
        Ok(Self {
            graph,
            sink: sink.to_string(),
            capacities,
            oracle,
            policy: Box::new(Greedy),
            ordering: None,
            oversize: OversizePolicy::default(),
            iteration_budget: None,
        })
    }

    pub fn with_policy<P>(mut self, policy: P) -> Self
    where
        P: BoundaryPolicy<C> + 'g,
    {
        self.policy = Box::new(policy);
        self
    }

    /// Overrides the ordering the policy prefers.
    pub fn with_ordering(mut self, ordering: ChildOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn with_oversize(mut self, oversize: OversizePolicy) -> Self {
        self.oversize = oversize;
        self
    }

    /// Caps the number of main-loop iterations. The default is derived from
    /// the size of the sink's ancestry.
    pub fn with_iteration_budget(mut self, budget: usize) -> Self {
        self.iteration_budget = Some(budget);
        self
    }

    pub fn sink(&self) -> &str {
        &self.sink
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// The ordering the run will use: the override if one was set,
    /// otherwise [`BoundaryPolicy::preferred_ordering`].
    pub fn ordering(&self) -> ChildOrdering {
        self.ordering
            .unwrap_or_else(|| self.policy.preferred_ordering())
    }

    /// Runs the traversal to completion.
    ///
    /// # Errors
    /// - [`PartitionError::UnknownNode`] if the sink vanished.
    /// - [`PartitionError::MalformedGraph`] on a cycle among the sink's
    ///   ancestors, an exceeded iteration budget, or an unclassified job.
    /// - [`PartitionError::CapacityExhausted`] with the partitions closed
    ///   so far.
    /// - [`PartitionError::OversizedJob`] under [`OversizePolicy::Fail`].
    /// - [`PartitionError::InvalidSize`] if the oracle misbehaves.
    pub fn partition(self) -> Result<PartitionOutcome, PartitionError> {
        let graph = self.graph;
        let scope: HashSet<String> = graph
            .upstream_of(&self.sink)?
            .into_iter()
            .map(str::to_string)
            .collect();

        if let Some((parent, child)) = graph.find_cycle_where(|id| scope.contains(id)) {
            return Err(GraphError::Cycle { parent, child }.into());
        }

        let budget = self
            .iteration_budget
            .unwrap_or_else(|| default_budget(graph, &scope));

        let ordering = self.ordering();
        if ordering == ChildOrdering::Strict
            && self.policy.preferred_ordering() == ChildOrdering::Relaxed
        {
            warn!(
                policy = self.policy.name(),
                "strict ordering already waits for every child; the policy will act like greedy"
            );
        }

        info!(
            sink = %self.sink,
            policy = self.policy.name(),
            ?ordering,
            jobs = scope.len(),
            sites = self.capacities.len(),
            "partitioning started"
        );

        let run = Run {
            graph,
            oracle: self.oracle,
            policy: self.policy,
            ordering,
            oversize: self.oversize,
            scope,
            state: TraversalState::new(),
            stack: Vec::new(),
            ledger: PartitionLedger::new(self.capacities),
            stats: EngineStats {
                iteration_budget: budget,
                ..EngineStats::default()
            },
            owed: Boundary::None,
        };
        run.execute(self.sink)
    }
}

/// Twice the number of in-scope nodes and edges, plus slack. Every loop
/// iteration pops one stack entry and a node is pushed at most once per
/// classified child, so an acyclic graph never gets close.
fn default_budget<C>(graph: &Graph<C>, scope: &HashSet<String>) -> usize {
    let edges: usize = scope
        .iter()
        .filter_map(|id| graph.parents_of(id))
        .map(<[String]>::len)
        .sum();
    2 * (scope.len() + edges) + 16
}

/// A boundary owed by the last commit, settled right before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    None,
    /// Fan-in flush: close, advance if possible, else reopen.
    Flush,
    /// Oversized singleton: close and advance.
    Close,
}

/// Jobs cleared for commit and the size charged for them.
#[derive(Debug)]
struct Admission {
    members: Vec<String>,
    delta: f64,
    overflow: bool,
}

/// Mutable state of one traversal.
struct Run<'g, C, O> {
    graph: &'g Graph<C>,
    oracle: O,
    policy: Box<dyn BoundaryPolicy<C> + 'g>,
    ordering: ChildOrdering,
    oversize: OversizePolicy,
    scope: HashSet<String>,
    state: TraversalState,
    stack: Vec<String>,
    ledger: PartitionLedger,
    stats: EngineStats,
    owed: Boundary,
}

impl<'g, C, O: SizeOracle> Run<'g, C, O> {
    fn execute(mut self, sink: String) -> Result<PartitionOutcome, PartitionError> {
        self.state.discover(&sink)?;
        self.state.set_depth(&sink, 0);
        self.stack.push(sink.clone());

        while let Some(job) = self.stack.last().cloned() {
            self.stats.iterations += 1;
            if self.stats.iterations > self.stats.iteration_budget {
                return Err(PartitionError::MalformedGraph {
                    detail: format!(
                        "iteration budget of {} exceeded",
                        self.stats.iteration_budget
                    ),
                });
            }
            if self.state.is(&job, Color::Black) {
                self.stack.pop();
                continue;
            }
            self.step(&job)?;
        }

        self.check_totality()?;

        let policy = self.policy.name().to_string();
        let books = self.ledger.finish();
        info!(
            partitions = books.partitions.len(),
            jobs = books.assignment.len(),
            deferrals = self.stats.deferrals,
            "partitioning finished"
        );

        Ok(PartitionOutcome {
            policy,
            sink,
            ordering: self.ordering,
            partitions: books.partitions,
            assignment: books.assignment,
            depths: self.state.into_depths(),
            stats: self.stats,
            ledger: books.stats,
        })
    }

    fn step(&mut self, job: &str) -> Result<(), PartitionError> {
        let view = PolicyView::new(self.graph, &self.state, &self.scope);
        let blocked = self.ordering == ChildOrdering::Strict && !view.children_classified(job);
        if blocked || self.policy.should_defer(job, &view) {
            self.stack.pop();
            self.state.undiscover(job)?;
            self.stats.deferrals += 1;
            debug!(job, blocked, "deferred");
            return Ok(());
        }

        let group = self.sanitize(job, self.policy.group(job, &view));
        let forced = self.policy.flush_after(job, &view);

        self.settle()?;
        let admission = if forced {
            self.force(job, group)?
        } else {
            self.admit(job, group)?
        };
        self.commit(job, &admission)?;

        self.owed = if forced {
            self.stats.forced_flushes += 1;
            debug!(job, "fan-in boundary after job");
            Boundary::Flush
        } else if admission.overflow {
            Boundary::Close
        } else {
            Boundary::None
        };
        Ok(())
    }

    /// Puts `job` first and drops anything that is black, out of scope, or
    /// repeated.
    fn sanitize(&self, job: &str, group: Vec<String>) -> Vec<String> {
        let mut members = vec![job.to_string()];
        for id in group {
            if id != job
                && self.scope.contains(&id)
                && !self.state.is(&id, Color::Black)
                && !members.contains(&id)
            {
                members.push(id);
            }
        }
        members
    }

    fn settle(&mut self) -> Result<(), PartitionError> {
        match std::mem::replace(&mut self.owed, Boundary::None) {
            Boundary::None => Ok(()),
            Boundary::Flush => {
                self.ledger.flush()?;
                Ok(())
            }
            Boundary::Close => self.advance(),
        }
    }

    fn advance(&mut self) -> Result<(), PartitionError> {
        match self.ledger.close_and_advance() {
            Ok(()) => Ok(()),
            Err(LedgerError::Exhausted { sites }) => Err(PartitionError::CapacityExhausted {
                sites,
                partial: self.ledger.closed().to_vec(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn measure(&self, members: &[String]) -> Result<f64, PartitionError> {
        let partition = self.ledger.current().ok_or(PartitionError::Ledger(
            LedgerError::Exhausted {
                sites: self.ledger.capacities().len(),
            },
        ))?;
        let size = self.oracle.group_size(members, partition);
        if !size.is_finite() || size < 0.0 {
            return Err(PartitionError::InvalidSize {
                job: members.first().cloned().unwrap_or_default(),
                size,
            });
        }
        Ok(size)
    }

    /// Clears a group against the capacity, closing and advancing first if
    /// it does not fit the open partition.
    ///
    /// A job too large for an empty partition moves that partition forward
    /// to the next site that can hold it. Only a job larger than every
    /// remaining capacity is oversized.
    fn admit(&mut self, job: &str, mut members: Vec<String>) -> Result<Admission, PartitionError> {
        let mut delta = self.measure(&members)?;
        if self.ledger.would_exceed(delta) && !self.ledger.current_is_empty() {
            self.advance()?;
            delta = self.measure(&members)?;
        }
        if self.ledger.would_exceed(delta) && members.len() > 1 {
            debug!(job, group = members.len(), "group exceeds an empty partition, taking job alone");
            members.truncate(1);
            delta = self.measure(&members)?;
        }
        if self.ledger.would_exceed(delta) && delta <= self.ledger.largest_remaining() {
            while self.ledger.would_exceed(delta) {
                self.ledger.skip_site()?;
            }
            debug!(job, size = delta, site = self.ledger.site_index(), "skipped to a larger site");
            delta = self.measure(&members)?;
        }
        if !self.ledger.would_exceed(delta) {
            return Ok(Admission {
                members,
                delta,
                overflow: false,
            });
        }

        let capacity = self.ledger.largest_remaining();
        match self.oversize {
            OversizePolicy::Fail => Err(PartitionError::OversizedJob {
                job: job.to_string(),
                size: delta,
                capacity,
            }),
            OversizePolicy::AllowSingleton => {
                warn!(job, size = delta, capacity, "admitting oversized job alone");
                self.stats.oversized_admissions += 1;
                Ok(Admission {
                    members,
                    delta,
                    overflow: true,
                })
            }
        }
    }

    /// Clears a group without any capacity check.
    fn force(&mut self, job: &str, members: Vec<String>) -> Result<Admission, PartitionError> {
        let delta = self.measure(&members)?;
        let overflow = self.ledger.would_exceed(delta);
        if overflow {
            warn!(
                job,
                size = delta,
                accumulated = self.ledger.current_accumulated(),
                capacity = self.ledger.capacity(),
                "fan-in job admitted over capacity"
            );
        }
        Ok(Admission {
            members,
            delta,
            overflow,
        })
    }

    /// Commits an admitted group, pops `job` and discovers white parents.
    ///
    /// The whole group size is charged to `job`; the other members are
    /// committed at zero so the partition total equals the checked size.
    fn commit(&mut self, job: &str, admission: &Admission) -> Result<(), PartitionError> {
        let graph = self.graph;
        let depth = self.state.depth(job).unwrap_or(0);

        for (i, member) in admission.members.iter().enumerate() {
            let charge = if i == 0 { admission.delta } else { 0.0 };
            self.ledger.commit(member, charge)?;
            if self.state.is(member, Color::White) {
                self.state.discover(member)?;
            }
            self.state.finalize(member)?;
            self.state.record_depth(member, depth);
            self.stats.classified += 1;
        }
        self.stack.pop();

        for member in &admission.members {
            let next = self.state.depth(member).unwrap_or(depth) + 1;
            for parent in graph.parents_of(member).unwrap_or_default() {
                if self.state.is(parent, Color::White) {
                    self.state.discover(parent)?;
                    self.state.record_depth(parent, next);
                    self.stack.push(parent.clone());
                }
            }
        }
        Ok(())
    }

    fn check_totality(&self) -> Result<(), PartitionError> {
        let mut missing = self
            .graph
            .ids()
            .filter(|id| self.scope.contains(*id) && !self.state.is(id, Color::Black));
        match missing.next() {
            None => Ok(()),
            Some(first) => Err(PartitionError::MalformedGraph {
                detail: format!(
                    "{} job(s) upstream of the sink were never classified, first '{first}'",
                    1 + missing.count()
                ),
            }),
        }
    }
}
