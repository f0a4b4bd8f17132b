// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Property-based tests for the job graph.
//!
//! Random DAGs are built with parents drawn only from lower indices, so
//! every generated graph is acyclic.

use proptest::prelude::*;
use std::collections::HashMap;
use workflow_graph::Graph;

// ── Strategies ─────────────────────────────────────────────────────────

fn dag_strategy(max: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    proptest::collection::vec(0..i, 0..=i.min(4)).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn build(parents: &[Vec<usize>]) -> Graph {
    let mut g = Graph::new();
    for i in 0..parents.len() {
        g.add_node(format!("n{i}"), ());
    }
    for (child, ps) in parents.iter().enumerate() {
        for p in ps {
            g.add_edge(&format!("n{p}"), &format!("n{child}")).unwrap();
        }
    }
    g
}

fn assert_symmetric(g: &Graph) {
    for node in g.nodes() {
        for child in node.children() {
            assert!(g.get_node(child).unwrap().has_parent(node.id()));
        }
        for parent in node.parents() {
            assert!(g.get_node(parent).unwrap().has_child(node.id()));
        }
    }
}

fn positions<'a>(order: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    order.enumerate().map(|(i, id)| (id, i)).collect()
}

// ── Properties ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_adjacency_is_symmetric(dag in dag_strategy(30)) {
        let g = build(&dag);
        assert_symmetric(&g);
        prop_assert!(!g.has_cycles());
    }

    #[test]
    fn prop_topological_sort_puts_parents_first(dag in dag_strategy(30)) {
        let g = build(&dag);
        let order = g.topological_sort().unwrap();
        prop_assert_eq!(order.len(), g.len());
        let pos = positions(order.iter().map(|n| n.id()));
        for node in g.nodes() {
            for parent in node.parents() {
                prop_assert!(pos[parent.as_str()] < pos[node.id()]);
            }
        }
    }

    #[test]
    fn prop_level_orders_visit_everything_once(dag in dag_strategy(30)) {
        let g = build(&dag);

        let down: Vec<&str> = g.level_order().map(|n| n.id()).collect();
        prop_assert_eq!(down.len(), g.len());
        let pos = positions(down.iter().copied());
        prop_assert_eq!(pos.len(), g.len());
        for node in g.nodes() {
            for parent in node.parents() {
                prop_assert!(pos[parent.as_str()] < pos[node.id()]);
            }
        }

        let up: Vec<&str> = g.bottom_up().map(|n| n.id()).collect();
        prop_assert_eq!(up.len(), g.len());
        let pos = positions(up.iter().copied());
        for node in g.nodes() {
            for child in node.children() {
                prop_assert!(pos[child.as_str()] < pos[node.id()]);
            }
        }
    }

    #[test]
    fn prop_upstream_is_closed_under_parents(dag in dag_strategy(30)) {
        let g = build(&dag);
        let sink = format!("n{}", g.len() - 1);
        let up = g.upstream_of(&sink).unwrap();
        prop_assert!(up.contains(sink.as_str()));
        for id in &up {
            for parent in g.parents_of(id).unwrap() {
                prop_assert!(up.contains(parent.as_str()));
            }
        }
    }

    #[test]
    fn prop_remove_node_keeps_reachability(dag in dag_strategy(20), victim in any::<prop::sample::Index>()) {
        let mut g = build(&dag);
        let victim = format!("n{}", victim.index(g.len()));
        let before: HashMap<String, Vec<String>> = g
            .ids()
            .filter(|id| *id != victim)
            .map(|id| {
                let mut up: Vec<String> = g
                    .upstream_of(id)
                    .unwrap()
                    .into_iter()
                    .filter(|u| *u != victim)
                    .map(str::to_string)
                    .collect();
                up.sort();
                (id.to_string(), up)
            })
            .collect();

        prop_assert!(g.remove_node(&victim));
        prop_assert!(!g.contains(&victim));
        assert_symmetric(&g);
        for (id, expected) in &before {
            let mut up: Vec<String> = g
                .upstream_of(id)
                .unwrap()
                .into_iter()
                .map(str::to_string)
                .collect();
            up.sort();
            prop_assert_eq!(&up, expected);
        }
    }
}
