// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for graph construction and traversal bookkeeping.

use crate::Color;

/// Errors raised while building or querying a [`crate::Graph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge or lookup referenced an identifier that is not in the graph.
    #[error("the node with identifier '{id}' does not exist")]
    UnknownNode { id: String },

    /// An edge was specified from a node to itself.
    #[error("invalid edge: node '{id}' cannot be its own parent")]
    SelfEdge { id: String },

    /// A node that must be new already exists.
    #[error("node with identifier '{id}' already exists")]
    DuplicateNode { id: String },

    /// The graph is not acyclic.
    #[error("cycle detected through edge '{parent}' -> '{child}'")]
    Cycle { parent: String, child: String },
}

/// An illegal colour transition on a [`crate::TraversalState`].
///
/// Colours only move forward (`White → Gray → Black`), with `Gray → White`
/// as the single permitted step back (un-discovery).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal colour transition for '{id}': {from:?} -> {to:?}")]
pub struct ColorError {
    pub id: String,
    pub from: Color,
    pub to: Color,
}
