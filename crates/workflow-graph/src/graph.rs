// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The job graph: nodes keyed by id with bidirectional adjacency.
//!
//! # Construction Protocol
//!
//! ```text
//! add_node(..) × N  every job first
//!       │
//!       ▼
//! add_edge / add_edges  then the dependencies
//!       │
//!       ▼
//! traversals        level order, bottom up, partitioning
//! ```
//!
//! Re-adding an existing id replaces the node *and drops all of its edges*
//! on both sides, so edges must be added only after all nodes.
//!
//! # Invariant
//!
//! If `b` is listed as a child of `a`, then `a` is listed as a parent of
//! `b`. Every mutator below preserves this.

use crate::iter::{BottomUp, LevelOrder};
use crate::{Color, GraphError, Node, TraversalState};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// A mutable directed graph of jobs.
///
/// Nodes are stored in insertion order, which makes every query and
/// iterator deterministic.
#[derive(Debug, Clone)]
pub struct Graph<C = ()> {
    nodes: IndexMap<String, Node<C>>,
}

impl<C> Default for Graph<C> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }
}

impl<C> Graph<C> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ───────────────────────────────────────────────

    /// Inserts a node, or replaces the node with the same id.
    ///
    /// Replacing discards the old node's edges in both directions and
    /// returns its content.
    pub fn add_node(&mut self, id: impl Into<String>, content: C) -> Option<C> {
        let id = id.into();
        let previous = self.nodes.get(&id).map(|old| {
            (old.parents().to_vec(), old.children().to_vec())
        });

        if let Some((parents, children)) = previous {
            tracing::debug!("replacing node '{id}' and dropping its edges");
            for parent in &parents {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.remove_child(&id);
                }
            }
            for child in &children {
                if let Some(c) = self.nodes.get_mut(child) {
                    c.remove_parent(&id);
                }
            }
        }

        self.nodes
            .insert(id.clone(), Node::new(id, content))
            .map(|old| old.into_content())
    }

    /// Adds a new node that becomes the parent of every current root.
    pub fn add_root(&mut self, id: impl Into<String>, content: C) -> Result<(), GraphError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode { id });
        }

        let roots: Vec<String> = self.roots().iter().map(|n| n.id().to_string()).collect();
        let mut root = Node::new(id.clone(), content);
        for existing in &roots {
            root.add_child(existing);
            if let Some(node) = self.nodes.get_mut(existing) {
                node.add_parent(&id);
            }
        }
        self.nodes.insert(id, root);
        Ok(())
    }

    /// Registers the edge `parent → child`.
    ///
    /// Adding an edge that already exists is a no-op.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<(), GraphError> {
        if parent == child {
            return Err(GraphError::SelfEdge {
                id: parent.to_string(),
            });
        }
        self.require(child)?;
        self.require(parent)?;

        if let Some(p) = self.nodes.get_mut(parent) {
            p.add_child(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.add_parent(parent);
        }
        Ok(())
    }

    /// Replaces the full parent list of `child` with `parents`.
    ///
    /// The child is unlinked from its previous parents first. All ids are
    /// checked before anything is changed, so a failed call leaves the
    /// graph untouched.
    pub fn add_edges<S: AsRef<str>>(&mut self, child: &str, parents: &[S]) -> Result<(), GraphError> {
        if parents.iter().any(|p| p.as_ref() == child) {
            return Err(GraphError::SelfEdge {
                id: child.to_string(),
            });
        }
        self.require(child)?;
        for parent in parents {
            self.require(parent.as_ref())?;
        }

        let old_parents = self
            .nodes
            .get_mut(child)
            .map(Node::take_parents)
            .unwrap_or_default();
        for old in &old_parents {
            if let Some(p) = self.nodes.get_mut(old) {
                p.remove_child(child);
            }
        }

        for parent in parents {
            let parent = parent.as_ref();
            if let Some(p) = self.nodes.get_mut(parent) {
                p.add_child(child);
            }
            if let Some(c) = self.nodes.get_mut(child) {
                c.add_parent(parent);
            }
        }
        Ok(())
    }

    /// Removes a node, linking each of its parents directly to each of its
    /// children so that transitive reachability is preserved.
    ///
    /// Returns `false` if no such node exists.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(removed) = self.nodes.shift_remove(id) else {
            return false;
        };

        for child in removed.children() {
            if let Some(c) = self.nodes.get_mut(child) {
                c.remove_parent(id);
            }
        }
        for parent in removed.parents() {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.remove_child(id);
                for child in removed.children() {
                    p.add_child(child);
                }
            }
            for child in removed.children() {
                if let Some(c) = self.nodes.get_mut(child) {
                    c.add_parent(parent);
                }
            }
        }
        true
    }

    /// Drops every edge in the graph, keeping the nodes.
    pub fn reset_edges(&mut self) {
        for node in self.nodes.values_mut() {
            node.reset_edges();
        }
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Looks up a node. A missing id is `None`, never an error.
    pub fn get_node(&self, id: &str) -> Option<&Node<C>> {
        self.nodes.get(id)
    }

    /// Looks up a node, turning a missing id into [`GraphError::UnknownNode`].
    pub fn require(&self, id: &str) -> Result<&Node<C>, GraphError> {
        self.nodes.get(id).ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn parents_of(&self, id: &str) -> Option<&[String]> {
        self.nodes.get(id).map(Node::parents)
    }

    pub fn children_of(&self, id: &str) -> Option<&[String]> {
        self.nodes.get(id).map(Node::children)
    }

    /// All nodes without parents, in insertion order.
    pub fn roots(&self) -> Vec<&Node<C>> {
        self.nodes.values().filter(|n| n.is_root()).collect()
    }

    /// All nodes without children, in insertion order.
    pub fn leaves(&self) -> Vec<&Node<C>> {
        self.nodes.values().filter(|n| n.is_leaf()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Node::out_degree).sum()
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<C>> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// The ids reachable from `id` by following parent edges, including
    /// `id` itself.
    pub fn upstream_of(&self, id: &str) -> Result<HashSet<&str>, GraphError> {
        let start = self.require(id)?;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&Node<C>> = VecDeque::new();
        seen.insert(start.id());
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for parent in node.parents() {
                if let Some(p) = self.nodes.get(parent) {
                    if seen.insert(p.id()) {
                        queue.push_back(p);
                    }
                }
            }
        }
        Ok(seen)
    }

    // ── Traversals ─────────────────────────────────────────────────

    /// Level-order traversal from the roots. A node is emitted only after
    /// all of its parents.
    pub fn level_order(&self) -> LevelOrder<'_, C> {
        LevelOrder::new(self)
    }

    /// Level-order traversal from the leaves. A node is emitted only after
    /// all of its children.
    pub fn bottom_up(&self) -> BottomUp<'_, C> {
        BottomUp::new(self)
    }

    /// Groups node ids by level-order depth.
    pub fn levels(&self) -> Vec<Vec<&str>> {
        let mut levels: Vec<Vec<&str>> = Vec::new();
        let mut iter = self.level_order();
        while let Some(node) = iter.next() {
            let depth = iter.depth(node.id()).unwrap_or(0);
            if levels.len() <= depth {
                levels.resize_with(depth + 1, Vec::new);
            }
            levels[depth].push(node.id());
        }
        levels
    }

    /// Orders nodes so that every parent precedes its children.
    pub fn topological_sort(&self) -> Result<Vec<&Node<C>>, GraphError> {
        let order: Vec<&Node<C>> = self.level_order().collect();
        if order.len() < self.len() {
            let (parent, child) = self.find_cycle().unwrap_or_default();
            return Err(GraphError::Cycle { parent, child });
        }
        Ok(order)
    }

    /// Returns one edge `(parent, child)` that closes a cycle, if any.
    pub fn find_cycle(&self) -> Option<(String, String)> {
        self.find_cycle_where(|_| true)
    }

    /// Like [`find_cycle`](Self::find_cycle), restricted to the nodes for
    /// which `include` returns `true`.
    pub fn find_cycle_where<F>(&self, include: F) -> Option<(String, String)>
    where
        F: Fn(&str) -> bool,
    {
        let mut state = TraversalState::new();

        for start in self.nodes.values() {
            if !include(start.id()) || !state.is(start.id(), Color::White) {
                continue;
            }
            state.discover(start.id()).ok()?;
            let mut stack: Vec<(&Node<C>, usize)> = vec![(start, 0)];

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = (frame.0, frame.1);
                let Some(child_id) = node.children().get(cursor) else {
                    state.finalize(node.id()).ok()?;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;
                if !include(child_id) {
                    continue;
                }

                match state.color(child_id) {
                    Color::White => {
                        let child = self.nodes.get(child_id)?;
                        state.discover(child_id).ok()?;
                        stack.push((child, 0));
                    }
                    Color::Gray => return Some((node.id().to_string(), child_id.clone())),
                    Color::Black => {}
                }
            }
        }
        None
    }

    pub fn has_cycles(&self) -> bool {
        self.find_cycle().is_some()
    }
}

impl<C> fmt::Display for Graph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.nodes.values() {
            writeln!(
                f,
                "\tJob -> {} Children {{{}}} Parents {{{}}}",
                node.id(),
                node.children().join(","),
                node.parents().join(","),
            )?;
        }
        Ok(())
    }
}
