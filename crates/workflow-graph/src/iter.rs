// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Level-order iterators.
//!
//! Both iterators keep their own [`TraversalState`], so they borrow the
//! graph immutably, can run side by side, and can be restarted simply by
//! asking the graph for a new one.
//!
//! A node is queued only once *every* node on its incoming side is black,
//! which is what keeps fan-in (diamonds) in order:
//!
//! ```text
//!     a          level 0
//!    / \
//!   b   c        level 1
//!    \ /
//!     d          level 2, emitted after both b and c
//! ```

use crate::{Color, Graph, Node, TraversalState};
use std::collections::VecDeque;

/// Which adjacency list a sweep advances along.
#[derive(Debug, Clone, Copy)]
enum Sweep {
    /// Roots first, following child edges.
    Down,
    /// Leaves first, following parent edges.
    Up,
}

#[derive(Debug)]
struct Frontier<'g, C> {
    graph: &'g Graph<C>,
    sweep: Sweep,
    state: TraversalState,
    queue: VecDeque<&'g Node<C>>,
}

impl<'g, C> Frontier<'g, C> {
    fn new(graph: &'g Graph<C>, sweep: Sweep) -> Self {
        let mut state = TraversalState::new();
        let mut queue = VecDeque::new();
        let seeds = match sweep {
            Sweep::Down => graph.roots(),
            Sweep::Up => graph.leaves(),
        };
        for node in seeds {
            if state.discover(node.id()).is_ok() {
                state.set_depth(node.id(), 0);
                queue.push_back(node);
            }
        }
        Self {
            graph,
            sweep,
            state,
            queue,
        }
    }

    fn forward(&self, node: &'g Node<C>) -> &'g [String] {
        match self.sweep {
            Sweep::Down => node.children(),
            Sweep::Up => node.parents(),
        }
    }

    fn backward(&self, node: &'g Node<C>) -> &'g [String] {
        match self.sweep {
            Sweep::Down => node.parents(),
            Sweep::Up => node.children(),
        }
    }

    fn advance(&mut self) -> Option<&'g Node<C>> {
        let node = self.queue.pop_front()?;
        let depth = self.state.depth(node.id()).unwrap_or(0);
        self.state.finalize(node.id()).ok()?;

        for next_id in self.forward(node) {
            let Some(next) = self.graph.get_node(next_id) else {
                continue;
            };
            let ready = self
                .state
                .all(self.backward(next).iter().map(String::as_str), Color::Black);
            if ready && self.state.discover(next_id).is_ok() {
                self.state.set_depth(next_id, depth + 1);
                self.queue.push_back(next);
            }
        }
        Some(node)
    }
}

/// Roots-first traversal; see [`Graph::level_order`].
#[derive(Debug)]
pub struct LevelOrder<'g, C> {
    frontier: Frontier<'g, C>,
}

impl<'g, C> LevelOrder<'g, C> {
    pub(crate) fn new(graph: &'g Graph<C>) -> Self {
        Self {
            frontier: Frontier::new(graph, Sweep::Down),
        }
    }

    /// Depth assigned to a node that has been queued or emitted.
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.frontier.state.depth(id)
    }

    /// Colour of a node in this traversal.
    pub fn color(&self, id: &str) -> Color {
        self.frontier.state.color(id)
    }
}

impl<'g, C> Iterator for LevelOrder<'g, C> {
    type Item = &'g Node<C>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frontier.advance()
    }
}

/// Leaves-first traversal; see [`Graph::bottom_up`].
#[derive(Debug)]
pub struct BottomUp<'g, C> {
    frontier: Frontier<'g, C>,
}

impl<'g, C> BottomUp<'g, C> {
    pub(crate) fn new(graph: &'g Graph<C>) -> Self {
        Self {
            frontier: Frontier::new(graph, Sweep::Up),
        }
    }

    /// Distance from the leaves assigned to a queued or emitted node.
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.frontier.state.depth(id)
    }

    pub fn color(&self, id: &str) -> Color {
        self.frontier.state.color(id)
    }
}

impl<'g, C> Iterator for BottomUp<'g, C> {
    type Item = &'g Node<C>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frontier.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(ids: &[&str], edges: &[(&str, &str)]) -> Graph {
        let mut g = Graph::new();
        for id in ids {
            g.add_node(*id, ());
        }
        for (p, c) in edges {
            g.add_edge(p, c).unwrap();
        }
        g
    }

    fn position(order: &[&str], id: &str) -> usize {
        order.iter().position(|x| *x == id).unwrap()
    }

    #[test]
    fn test_level_order_diamond() {
        let g = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let order: Vec<&str> = g.level_order().map(Node::id).collect();
        assert_eq!(order.len(), 4);
        assert!(position(&order, "d") > position(&order, "b"));
        assert!(position(&order, "d") > position(&order, "c"));
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_level_order_uneven_fan_in() {
        // d has parents at depth 0 (a) and depth 2 (c).
        let g = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")],
        );
        let mut iter = g.level_order();
        let order: Vec<&str> = iter.by_ref().map(Node::id).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert_eq!(iter.depth("d"), Some(3));
        assert_eq!(iter.color("d"), Color::Black);
    }

    #[test]
    fn test_level_order_is_restartable() {
        let g = build(&["a", "b"], &[("a", "b")]);
        let first: Vec<&str> = g.level_order().map(Node::id).collect();
        let second: Vec<&str> = g.level_order().map(Node::id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_iterators_do_not_interfere() {
        let g = build(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let mut down = g.level_order();
        let mut up = g.bottom_up();
        assert_eq!(down.next().map(Node::id), Some("a"));
        assert_eq!(up.next().map(Node::id), Some("c"));
        assert_eq!(down.next().map(Node::id), Some("b"));
        assert_eq!(up.next().map(Node::id), Some("b"));
    }

    #[test]
    fn test_bottom_up_diamond() {
        let g = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let mut iter = g.bottom_up();
        let order: Vec<&str> = iter.by_ref().map(Node::id).collect();
        assert_eq!(order, vec!["d", "b", "c", "a"]);
        assert_eq!(iter.depth("a"), Some(2));
    }

    #[test]
    fn test_cycle_members_are_never_emitted() {
        let g = build(
            &["r", "x", "y"],
            &[("r", "x"), ("x", "y"), ("y", "x")],
        );
        let order: Vec<&str> = g.level_order().map(Node::id).collect();
        assert_eq!(order, vec!["r"]);
    }

    #[test]
    fn test_empty_graph() {
        let g: Graph = Graph::new();
        assert_eq!(g.level_order().count(), 0);
        assert_eq!(g.bottom_up().count(), 0);
    }
}
