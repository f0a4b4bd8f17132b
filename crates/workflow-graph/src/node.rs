// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A single job node and its adjacency lists.

/// A node in the job graph.
///
/// Adjacency is stored as ordered lists of neighbour ids, never as owned
/// neighbours, so a node does not keep any other node alive. `content` is
/// whatever handle the builder chose to attach (an index into a job table,
/// an `Arc`, `()`); the graph never inspects it.
#[derive(Debug, Clone)]
pub struct Node<C> {
    id: String,
    content: C,
    parents: Vec<String>,
    children: Vec<String>,
}

impl<C> Node<C> {
    pub(crate) fn new(id: String, content: C) -> Self {
        Self {
            id,
            content,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Parent ids in the order the edges were added.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Child ids in the order the edges were added.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn in_degree(&self) -> usize {
        self.parents.len()
    }

    pub fn out_degree(&self) -> usize {
        self.children.len()
    }

    /// `true` if the node has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_parent(&self, id: &str) -> bool {
        self.parents.iter().any(|p| p == id)
    }

    pub fn has_child(&self, id: &str) -> bool {
        self.children.iter().any(|c| c == id)
    }

    pub(crate) fn add_parent(&mut self, id: &str) {
        if !self.has_parent(id) {
            self.parents.push(id.to_string());
        }
    }

    pub(crate) fn add_child(&mut self, id: &str) {
        if !self.has_child(id) {
            self.children.push(id.to_string());
        }
    }

    pub(crate) fn remove_parent(&mut self, id: &str) {
        self.parents.retain(|p| p != id);
    }

    pub(crate) fn remove_child(&mut self, id: &str) {
        self.children.retain(|c| c != id);
    }

    pub(crate) fn into_content(self) -> C {
        self.content
    }

    pub(crate) fn take_parents(&mut self) -> Vec<String> {
        std::mem::take(&mut self.parents)
    }

    pub(crate) fn reset_edges(&mut self) {
        self.parents.clear();
        self.children.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_isolated() {
        let n = Node::new("a".into(), 7u32);
        assert_eq!(n.id(), "a");
        assert_eq!(*n.content(), 7);
        assert!(n.is_root());
        assert!(n.is_leaf());
    }

    #[test]
    fn test_adjacency_ignores_duplicates() {
        let mut n = Node::new("a".into(), ());
        n.add_child("b");
        n.add_child("b");
        n.add_parent("p");
        n.add_parent("p");
        assert_eq!(n.children(), &["b".to_string()]);
        assert_eq!(n.parents(), &["p".to_string()]);
        assert_eq!(n.out_degree(), 1);
        assert_eq!(n.in_degree(), 1);
    }

    #[test]
    fn test_remove_and_reset() {
        let mut n = Node::new("a".into(), ());
        n.add_child("b");
        n.add_child("c");
        n.remove_child("b");
        assert_eq!(n.children(), &["c".to_string()]);

        n.add_parent("p");
        n.reset_edges();
        assert!(n.is_root() && n.is_leaf());
    }
}
