// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # workflow-graph
//!
//! A general-purpose, mutable directed graph of jobs keyed by identifier.
//! It knows nothing about sizes or capacities; the partition planner
//! builds on it.
//!
//! - [`Graph`]: owns every [`Node`]; parent/child adjacency is always kept
//!   bidirectional.
//! - [`Node`]: id, an opaque content handle, ordered parent and child ids.
//! - [`TraversalState`] / [`Color`]: white/gray/black markers and depths,
//!   owned by whichever traversal is running rather than by the nodes.
//! - [`LevelOrder`] / [`BottomUp`]: fan-in-safe level iterators.
//!
//! # Example
//! ```
//! use workflow_graph::Graph;
//!
//! let mut g: Graph = Graph::new();
//! for id in ["a", "b", "c", "d"] {
//!     g.add_node(id, ());
//! }
//! g.add_edge("a", "b").unwrap();
//! g.add_edge("a", "c").unwrap();
//! g.add_edges("d", &["b", "c"]).unwrap();
//!
//! let order: Vec<&str> = g.level_order().map(|n| n.id()).collect();
//! assert_eq!(order, ["a", "b", "c", "d"]);
//! ```

mod error;
pub mod graph;
pub mod iter;
mod node;
pub mod traversal;

pub use error::{ColorError, GraphError};
pub use graph::Graph;
pub use iter::{BottomUp, LevelOrder};
pub use node::Node;
pub use traversal::{Color, TraversalState};
