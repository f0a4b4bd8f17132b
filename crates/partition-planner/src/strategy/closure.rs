// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Descendant-closure grouping policy.
//!
//! When a job is classified, its not-yet-black in-scope descendants come
//! with it and the whole group is checked against the capacity at once, so
//! a child is never left behind in a later partition without the siblings
//! it was grouped with:
//!
//! ```text
//!     j            group(j) = [j, a, b, c]   (a, b, c not yet black)
//!    / \
//!   a   b
//!        \
//!         c
//! ```
//!
//! If the whole group does not fit into an empty partition, the engine
//! falls back to classifying `j` alone.
//!
//! Pending descendants only exist if `j` may be popped before its children
//! are black, so the policy prefers [`ChildOrdering::Relaxed`].

use crate::engine::ChildOrdering;
use crate::strategy::{BoundaryPolicy, PolicyView};
use std::collections::{HashSet, VecDeque};
use workflow_graph::Color;

/// Classifies a job together with its pending descendants.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescendantClosure;

impl<C> BoundaryPolicy<C> for DescendantClosure {
    fn name(&self) -> &str {
        "descendant-closure"
    }

    fn group(&self, job: &str, view: &PolicyView<'_, C>) -> Vec<String> {
        let mut group = vec![job.to_string()];
        let mut seen: HashSet<&str> = HashSet::from([job]);
        let mut queue: VecDeque<&str> = VecDeque::from([job]);

        while let Some(id) = queue.pop_front() {
            for child in view.scoped_children(id) {
                if view.color(child) != Color::Black && seen.insert(child) {
                    group.push(child.to_string());
                    queue.push_back(child);
                }
            }
        }
        group
    }

    fn preferred_ordering(&self) -> ChildOrdering {
        ChildOrdering::Relaxed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::{build, scope_of};
    use workflow_graph::TraversalState;

    #[test]
    fn test_group_collects_pending_descendants() {
        let g = build(
            &["j", "a", "b", "c", "done"],
            &[("j", "a"), ("j", "b"), ("b", "c"), ("j", "done")],
        );
        let scope = scope_of(&g);
        let mut state = TraversalState::new();
        state.discover("done").unwrap();
        state.finalize("done").unwrap();

        let group = DescendantClosure.group("j", &PolicyView::new(&g, &state, &scope));
        assert_eq!(group, vec!["j", "a", "b", "c"]);
    }

    #[test]
    fn test_group_of_leaf_is_itself() {
        let g = build(&["x"], &[]);
        let scope = scope_of(&g);
        let state = TraversalState::new();
        let group = DescendantClosure.group("x", &PolicyView::new(&g, &state, &scope));
        assert_eq!(group, vec!["x"]);
    }

    #[test]
    fn test_group_shares_diamond_bottom_once() {
        let g = build(
            &["j", "a", "b", "d"],
            &[("j", "a"), ("j", "b"), ("a", "d"), ("b", "d")],
        );
        let scope = scope_of(&g);
        let state = TraversalState::new();
        let group = DescendantClosure.group("j", &PolicyView::new(&g, &state, &scope));
        assert_eq!(group, vec!["j", "a", "b", "d"]);
    }
}
