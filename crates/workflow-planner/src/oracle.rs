// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact-size oracle over a workflow's file usage.

use crate::workflow::Workflow;
use capacity_ledger::Partition;
use partition_planner::SizeOracle;
use std::collections::{HashMap, HashSet};

/// Charges each job the files it stages that the partition does not
/// already hold.
///
/// A file shared by two jobs in the same partition is counted once.
/// Executables are never charged.
#[derive(Debug, Clone, Default)]
pub struct FileSizeOracle {
    files: HashMap<String, Vec<(String, f64)>>,
}

impl FileSizeOracle {
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let files = workflow
            .jobs
            .iter()
            .map(|job| {
                let staged = job
                    .staged_files()
                    .map(|f| (f.lfn.clone(), f.size))
                    .collect();
                (job.id.clone(), staged)
            })
            .collect();
        Self { files }
    }

    fn files_of(&self, job: &str) -> &[(String, f64)] {
        self.files.get(job).map(Vec::as_slice).unwrap_or_default()
    }

    /// Logical names already charged to `partition`.
    fn charged<'a>(&'a self, partition: &'a Partition) -> HashSet<&'a str> {
        partition
            .members()
            .flat_map(|member| self.files_of(member))
            .map(|(lfn, _)| lfn.as_str())
            .collect()
    }

    fn charge<'a>(&'a self, jobs: impl IntoIterator<Item = &'a str>, partition: &'a Partition) -> f64 {
        let mut charged = self.charged(partition);
        jobs.into_iter()
            .flat_map(|job| self.files_of(job))
            .filter(|(lfn, _)| charged.insert(lfn.as_str()))
            .map(|(_, size)| *size)
            .sum()
    }
}

impl SizeOracle for FileSizeOracle {
    fn size_of(&self, job: &str, partition: &Partition) -> f64 {
        self.charge([job], partition)
    }

    fn group_size(&self, jobs: &[String], partition: &Partition) -> f64 {
        self.charge(jobs.iter().map(String::as_str), partition)
    }
}
