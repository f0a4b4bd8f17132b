// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Traversal-scoped colouring and depth bookkeeping.
//!
//! The graph itself never stores colours. Whoever runs a traversal (an
//! iterator, the cycle checker, the partition engine) owns a
//! [`TraversalState`] keyed by node id, so several traversals can borrow the
//! same graph at once and none of them needs a colour reset afterwards.
//!
//! ```text
//!   White ──discover──► Gray ──finalize──► Black
//!     ▲                  │
//!     └────undiscover────┘
//! ```

use crate::ColorError;
use std::collections::HashMap;

/// Per-node traversal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Not yet discovered.
    #[default]
    White,
    /// Discovered and pending processing.
    Gray,
    /// Finished. Terminal.
    Black,
}

/// Colours and first-discovery depths for one traversal.
#[derive(Debug, Clone, Default)]
pub struct TraversalState {
    colors: HashMap<String, Color>,
    depths: HashMap<String, usize>,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the colour of `id`. Unknown ids are white.
    pub fn color(&self, id: &str) -> Color {
        self.colors.get(id).copied().unwrap_or_default()
    }

    pub fn is(&self, id: &str, color: Color) -> bool {
        self.color(id) == color
    }

    /// Returns `true` if every id yielded by `ids` has the given colour.
    pub fn all<'a, I>(&self, ids: I, color: Color) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().all(|id| self.is(id, color))
    }

    /// `White → Gray`.
    pub fn discover(&mut self, id: &str) -> Result<(), ColorError> {
        self.transition(id, Color::White, Color::Gray)
    }

    /// `Gray → Black`. A black node can never change colour again.
    pub fn finalize(&mut self, id: &str) -> Result<(), ColorError> {
        self.transition(id, Color::Gray, Color::Black)
    }

    /// `Gray → White`, so a later path can discover the node again.
    pub fn undiscover(&mut self, id: &str) -> Result<(), ColorError> {
        self.transition(id, Color::Gray, Color::White)
    }

    fn transition(&mut self, id: &str, from: Color, to: Color) -> Result<(), ColorError> {
        let current = self.color(id);
        if current != from {
            return Err(ColorError {
                id: id.to_string(),
                from: current,
                to,
            });
        }
        self.colors.insert(id.to_string(), to);
        Ok(())
    }

    /// Records `depth` for `id` unless a depth is already known.
    ///
    /// Returns the depth that is in effect afterwards.
    pub fn record_depth(&mut self, id: &str, depth: usize) -> usize {
        *self.depths.entry(id.to_string()).or_insert(depth)
    }

    /// Overwrites the depth of `id`.
    pub fn set_depth(&mut self, id: &str, depth: usize) {
        self.depths.insert(id.to_string(), depth);
    }

    pub fn depth(&self, id: &str) -> Option<usize> {
        self.depths.get(id).copied()
    }

    pub fn depths(&self) -> &HashMap<String, usize> {
        &self.depths
    }

    /// Number of nodes currently holding `color` (white nodes are only
    /// counted once they have been seen).
    pub fn count(&self, color: Color) -> usize {
        self.colors.values().filter(|c| **c == color).count()
    }

    /// Forgets every colour and depth.
    pub fn reset(&mut self) {
        self.colors.clear();
        self.depths.clear();
    }

    /// Consumes the state and returns the depth map.
    pub fn into_depths(self) -> HashMap<String, usize> {
        self.depths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_is_white() {
        let s = TraversalState::new();
        assert_eq!(s.color("x"), Color::White);
        assert!(s.depth("x").is_none());
    }

    #[test]
    fn test_forward_transitions() {
        let mut s = TraversalState::new();
        s.discover("a").unwrap();
        assert!(s.is("a", Color::Gray));
        s.finalize("a").unwrap();
        assert!(s.is("a", Color::Black));
        assert_eq!(s.count(Color::Black), 1);
    }

    #[test]
    fn test_black_is_terminal() {
        let mut s = TraversalState::new();
        s.discover("a").unwrap();
        s.finalize("a").unwrap();

        let err = s.undiscover("a").unwrap_err();
        assert_eq!(err.from, Color::Black);
        assert!(s.discover("a").is_err());
        assert!(s.finalize("a").is_err());
        assert!(s.is("a", Color::Black));
    }

    #[test]
    fn test_finalize_requires_discovery() {
        let mut s = TraversalState::new();
        let err = s.finalize("a").unwrap_err();
        assert_eq!(err.from, Color::White);
        assert_eq!(err.to, Color::Black);
    }

    #[test]
    fn test_undiscover_round_trip() {
        let mut s = TraversalState::new();
        s.discover("a").unwrap();
        s.undiscover("a").unwrap();
        assert!(s.is("a", Color::White));
        s.discover("a").unwrap();
        assert!(s.is("a", Color::Gray));
    }

    #[test]
    fn test_record_depth_keeps_first() {
        let mut s = TraversalState::new();
        assert_eq!(s.record_depth("a", 3), 3);
        assert_eq!(s.record_depth("a", 1), 3);
        s.set_depth("a", 1);
        assert_eq!(s.depth("a"), Some(1));
    }

    #[test]
    fn test_all_and_reset() {
        let mut s = TraversalState::new();
        for id in ["a", "b"] {
            s.discover(id).unwrap();
            s.finalize(id).unwrap();
        }
        assert!(s.all(["a", "b"], Color::Black));
        assert!(!s.all(["a", "c"], Color::Black));

        s.reset();
        assert!(s.all(["a", "b"], Color::White));
    }
}
