// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dependencies between the sub-workflows an outcome describes.

use partition_planner::PartitionOutcome;
use std::collections::BTreeSet;
use workflow_graph::Graph;

/// Partition `parent` must finish before partition `child` starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct PartitionDependency {
    pub parent: usize,
    pub child: usize,
}

/// Every graph edge between two assigned jobs, split by whether it stays
/// inside one partition.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SubWorkflows {
    /// `(parent job, child job)` edges inside a partition.
    pub intra: Vec<(String, String)>,
    /// Partition-level edges, deduplicated and sorted.
    pub inter: Vec<PartitionDependency>,
}

impl SubWorkflows {
    /// Classifies the edges of `graph` against `outcome`. Edges touching a
    /// job outside the sink's ancestry are ignored.
    pub fn derive<C>(graph: &Graph<C>, outcome: &PartitionOutcome) -> Self {
        let mut intra = Vec::new();
        let mut inter = BTreeSet::new();
        for node in graph.nodes() {
            let Some(child) = outcome.partition_of(node.id()) else {
                continue;
            };
            for parent_id in node.parents() {
                let Some(parent) = outcome.partition_of(parent_id) else {
                    continue;
                };
                if parent == child {
                    intra.push((parent_id.clone(), node.id().to_string()));
                } else {
                    inter.insert(PartitionDependency { parent, child });
                }
            }
        }
        Self {
            intra,
            inter: inter.into_iter().collect(),
        }
    }

    /// Partitions that `partition` waits on.
    pub fn prerequisites(&self, partition: usize) -> impl Iterator<Item = usize> + '_ {
        self.inter
            .iter()
            .filter(move |d| d.child == partition)
            .map(|d| d.parent)
    }
}
