// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Workflow documents and their conversion into a job graph.
//!
//! # JSON Format
//! ```json
//! {
//!   "name": "montage",
//!   "jobs": [
//!     { "id": "project_1", "transformation": "mProject",
//!       "uses": [ { "lfn": "raw_1.fits", "link": "input", "size": 4.2 },
//!                 { "lfn": "proj_1.fits", "link": "output", "size": 8.0 } ],
//!       "parents": [] }
//!   ]
//! }
//! ```

use crate::PlannerError;
use std::collections::HashSet;
use std::path::Path;
use workflow_graph::Graph;

/// Index of a job in [`Workflow::jobs`], stored as node content.
pub type JobHandle = usize;

/// Direction in which a job uses a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Input,
    Output,
    Inout,
}

/// A file a job reads or writes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileUse {
    /// Logical file name.
    pub lfn: String,
    pub link: LinkKind,
    /// Size in the same unit as site capacities.
    #[serde(default)]
    pub size: f64,
    /// Executables are staged separately and never charged to a partition.
    #[serde(default)]
    pub executable: bool,
}

/// One job of a workflow.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobSpec {
    pub id: String,
    #[serde(default)]
    pub transformation: String,
    #[serde(default)]
    pub uses: Vec<FileUse>,
    /// Ids of the jobs this one depends on.
    #[serde(default)]
    pub parents: Vec<String>,
}

impl JobSpec {
    /// Files that count towards a partition's size: every non-executable
    /// file, each logical name once.
    pub fn staged_files(&self) -> impl Iterator<Item = &FileUse> {
        let mut seen = HashSet::new();
        self.uses
            .iter()
            .filter(move |f| !f.executable && seen.insert(f.lfn.as_str()))
    }
}

/// A named set of jobs and their dependencies.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

impl Workflow {
    /// Loads a workflow from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, PlannerError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses a workflow from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PlannerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PlannerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn job(&self, handle: JobHandle) -> Option<&JobSpec> {
        self.jobs.get(handle)
    }

    /// Builds the job graph. Node content is the job's index in
    /// [`jobs`](Self::jobs).
    ///
    /// Fails on duplicate job ids, unknown parents and self-dependencies.
    pub fn to_graph(&self) -> Result<Graph<JobHandle>, PlannerError> {
        let mut graph = Graph::new();
        for (handle, job) in self.jobs.iter().enumerate() {
            if graph.add_node(job.id.as_str(), handle).is_some() {
                return Err(PlannerError::DuplicateJob { id: job.id.clone() });
            }
        }
        for job in &self.jobs {
            graph.add_edges(&job.id, &job.parents)?;
        }
        tracing::debug!(
            workflow = %self.name,
            jobs = graph.len(),
            edges = graph.edge_count(),
            "workflow graph built"
        );
        Ok(graph)
    }
}

/// Finds the job the backward traversal starts from when no sink is given:
/// starting at the first job, follow the first child until a job without
/// children is reached.
///
/// Returns `None` for an empty graph, or if the walk revisits a job.
pub fn rear_job<C>(graph: &Graph<C>) -> Option<&str> {
    let mut current = graph.nodes().next()?;
    for _ in 0..graph.len() {
        match current.children().first() {
            None => return Some(current.id()),
            Some(child) => current = graph.get_node(child)?,
        }
    }
    None
}
