// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Property-based tests for the backward partitioner.
//!
//! Random DAGs are generated so that node `i` may only depend on nodes with
//! a lower index; the last node is the sink. Every run must:
//! - assign each ancestor of the sink exactly once (totality)
//! - keep every partition within its capacity (unless a boundary was forced)
//! - under strict ordering, never place a parent before its child
//! - make each job black exactly once

use capacity_ledger::CapacitySequence;
use partition_planner::{
    BackwardPartitioner, ChildOrdering, FixedSizes, PartitionError, PartitionOutcome, PolicyKind,
    UniformSize,
};
use proptest::prelude::*;
use std::collections::HashMap;
use workflow_graph::Graph;

// ── Strategies ─────────────────────────────────────────────────────────

/// Parent lists for a DAG of 1..=max nodes; parents of `i` are all `< i`.
fn dag_strategy(max: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    proptest::collection::vec(0..i, 0..=i.min(3)).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn policy_strategy() -> impl Strategy<Value = PolicyKind> {
    prop_oneof![
        Just(PolicyKind::Greedy),
        Just(PolicyKind::FanOut),
        Just(PolicyKind::Closure),
    ]
}

// ── Helpers ────────────────────────────────────────────────────────────

fn name(i: usize) -> String {
    format!("j{i}")
}

fn build(parents: &[Vec<usize>]) -> Graph {
    let mut g = Graph::new();
    for i in 0..parents.len() {
        g.add_node(name(i), ());
    }
    for (child, ps) in parents.iter().enumerate() {
        for p in ps {
            g.add_edge(&name(*p), &name(child)).unwrap();
        }
    }
    g
}

fn sizes(count: usize, weights: &[u32]) -> FixedSizes {
    (0..count)
        .map(|i| (name(i), f64::from(weights[i % weights.len()])))
        .collect()
}

fn run(
    g: &Graph,
    oracle: FixedSizes,
    capacity: f64,
    kind: PolicyKind,
    ordering: ChildOrdering,
) -> Result<PartitionOutcome, PartitionError> {
    let sink = name(g.len() - 1);
    // One partition per job is the worst case, so this many sites always suffice.
    let caps = CapacitySequence::from_values(vec![capacity; g.len()]).unwrap();
    BackwardPartitioner::new(g, &sink, caps, oracle)?
        .with_policy(kind.build::<()>(3, 2))
        .with_ordering(ordering)
        .partition()
}

fn assert_total(g: &Graph, out: &PartitionOutcome) {
    let scope = g.upstream_of(&out.sink).unwrap();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in &out.partitions {
        for job in p.members() {
            *counts.entry(job).or_default() += 1;
        }
    }
    assert_eq!(counts.len(), scope.len());
    for job in &scope {
        assert_eq!(counts.get(job), Some(&1), "job {job} not assigned exactly once");
        assert!(out.assignment.contains_key(*job));
    }
}

// ── Properties ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_strict_runs_are_total_bounded_and_ordered(
        dag in dag_strategy(24),
        weights in proptest::collection::vec(1u32..=10, 1..8),
        capacity in 10u32..=40,
        kind in policy_strategy(),
    ) {
        let g = build(&dag);
        let out = run(&g, sizes(g.len(), &weights), f64::from(capacity), kind, ChildOrdering::Strict)
            .unwrap();

        assert_total(&g, &out);
        for p in &out.partitions {
            prop_assert!(p.accumulated() <= p.capacity());
        }
        for (job, &child_partition) in &out.assignment {
            for parent in g.parents_of(job).unwrap() {
                prop_assert!(out.assignment[parent] >= child_partition);
            }
        }
        prop_assert_eq!(out.stats.classified, out.assignment.len());
        out.validate(&g).unwrap();
    }

    #[test]
    fn prop_relaxed_runs_are_total_and_bounded(
        dag in dag_strategy(24),
        weights in proptest::collection::vec(1u32..=10, 1..8),
        capacity in 10u32..=40,
        kind in policy_strategy(),
    ) {
        let g = build(&dag);
        let out = run(&g, sizes(g.len(), &weights), f64::from(capacity), kind, ChildOrdering::Relaxed)
            .unwrap();

        assert_total(&g, &out);
        for p in &out.partitions {
            prop_assert!(p.accumulated() <= p.capacity());
        }
        prop_assert_eq!(out.stats.classified, out.assignment.len());
        out.validate(&g).unwrap();
    }

    #[test]
    fn prop_fan_in_flush_keeps_order(
        dag in dag_strategy(24),
        capacity in 4u32..=20,
    ) {
        let g = build(&dag);
        let out = run(&g, sizes(g.len(), &[1]), f64::from(capacity), PolicyKind::FanIn, ChildOrdering::Strict)
            .unwrap();

        assert_total(&g, &out);
        let overflowed = out.partitions.iter().filter(|p| p.is_overflowed()).count();
        prop_assert!(overflowed <= out.stats.forced_flushes);
        out.validate(&g).unwrap();
    }

    #[test]
    fn prop_depths_cover_every_assigned_job(dag in dag_strategy(16)) {
        let g = build(&dag);
        let out = run(&g, sizes(g.len(), &[1]), 1000.0, PolicyKind::Greedy, ChildOrdering::Strict)
            .unwrap();
        prop_assert_eq!(out.depths.get(&out.sink).copied(), Some(0));
        for job in out.assignment.keys() {
            prop_assert!(out.depths.contains_key(job));
        }
        prop_assert_eq!(out.num_partitions(), 1);
    }

    #[test]
    fn prop_lone_job_is_oversized_only_above_every_capacity(
        size in 1u32..=300,
        capacities in proptest::collection::vec(1u32..=200, 1..6),
    ) {
        let g = build(&[Vec::new()]);
        let largest = capacities.iter().copied().max().unwrap_or(0);
        let caps = CapacitySequence::from_values(capacities.iter().map(|c| f64::from(*c))).unwrap();
        let result = BackwardPartitioner::new(&g, &name(0), caps, UniformSize(f64::from(size)))
            .unwrap()
            .partition();

        if size > largest {
            let is_oversized = matches!(
                result,
                Err(PartitionError::OversizedJob { capacity, .. }) if capacity == f64::from(largest)
            );
            prop_assert!(is_oversized);
        } else {
            let out = result.unwrap();
            let site = out.partitions[0].site_index();
            prop_assert!(out.partitions[0].capacity() >= f64::from(size));
            // The first site that holds the job, none skipped needlessly.
            prop_assert!(capacities[..site].iter().all(|c| *c < size));
        }
    }
}

// ── Hand-computed scenarios ────────────────────────────────────────────

/// `A → B → C → D`, every job 40, sink `D`.
fn abcd() -> Graph {
    let mut g = Graph::new();
    for id in ["A", "B", "C", "D"] {
        g.add_node(id, ());
    }
    g.add_edge("A", "B").unwrap();
    g.add_edge("B", "C").unwrap();
    g.add_edge("C", "D").unwrap();
    g
}

#[test]
fn test_two_sites_of_one_hundred() {
    let g = abcd();
    let caps = CapacitySequence::from_values([100.0, 100.0]).unwrap();
    let out = BackwardPartitioner::new(&g, "D", caps, UniformSize(40.0))
        .unwrap()
        .partition()
        .unwrap();

    assert_eq!(out.members(), vec![vec!["D", "C"], vec!["B", "A"]]);
    assert_eq!(out.partitions[0].accumulated(), 80.0);
    assert_eq!(out.partitions[1].accumulated(), 80.0);

    let expected: HashMap<String, usize> = [("D", 0), ("C", 0), ("B", 1), ("A", 1)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert_eq!(out.assignment, expected);
    out.validate(&g).unwrap();
}

#[test]
fn test_single_site_of_fifty_is_exhausted() {
    let g = abcd();
    let caps = CapacitySequence::from_values([50.0]).unwrap();
    let err = BackwardPartitioner::new(&g, "D", caps, UniformSize(40.0))
        .unwrap()
        .partition()
        .unwrap_err();

    assert!(matches!(err, PartitionError::CapacityExhausted { .. }));
    let partial = err.partial().unwrap();
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].members().collect::<Vec<_>>(), ["D"]);
    assert_eq!(partial[0].accumulated(), 40.0);
}

/// `A → B → C → D` with B much larger than its neighbours.
fn heavy_b(b: f64) -> FixedSizes {
    [("D", 40.0), ("C", 40.0), ("B", b), ("A", 10.0)]
        .into_iter()
        .collect()
}

#[test]
fn test_job_held_by_a_later_site_is_not_oversized() {
    let g = abcd();
    let caps = CapacitySequence::from_values([100.0, 10.0, 200.0]).unwrap();
    let out = BackwardPartitioner::new(&g, "D", caps, heavy_b(150.0))
        .unwrap()
        .partition()
        .unwrap();

    assert_eq!(out.members(), vec![vec!["D", "C"], vec!["B", "A"]]);
    assert_eq!(out.partitions[1].site_index(), 2);
    assert_eq!(out.partitions[1].accumulated(), 160.0);
    assert_eq!(out.ledger.sites_skipped, 1);
    out.validate(&g).unwrap();
}

#[test]
fn test_job_above_every_capacity_is_oversized() {
    let g = abcd();
    let caps = CapacitySequence::from_values([100.0, 10.0, 200.0]).unwrap();
    let err = BackwardPartitioner::new(&g, "D", caps, heavy_b(250.0))
        .unwrap()
        .partition()
        .unwrap_err();

    match err {
        PartitionError::OversizedJob {
            job,
            size,
            capacity,
        } => {
            assert_eq!(job, "B");
            assert_eq!(size, 250.0);
            assert_eq!(capacity, 200.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_graph_round_trip_roots_and_leaves() {
    let g = abcd();
    let roots: Vec<&str> = g.roots().iter().map(|n| n.id()).collect();
    let leaves: Vec<&str> = g.leaves().iter().map(|n| n.id()).collect();
    assert_eq!(roots, ["A"]);
    assert_eq!(leaves, ["D"]);
    assert_eq!(g.len(), 4);
    assert_eq!(g.edge_count(), 3);
}
