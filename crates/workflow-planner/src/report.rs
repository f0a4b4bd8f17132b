// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Human- and machine-readable plan reports.

use crate::sites::ResolvedSites;
use crate::subworkflow::{PartitionDependency, SubWorkflows};
use crate::PlannerError;
use capacity_ledger::{LedgerStats, Partition};
use partition_planner::{EngineStats, PartitionOutcome};
use std::collections::HashMap;
use std::fmt::Write as _;

/// One partition, labelled with the site it was sized for.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PartitionReport {
    pub id: usize,
    /// Handle of the site whose capacity this partition was opened under.
    pub site: Option<String>,
    pub jobs: Vec<String>,
    pub accumulated: f64,
    pub capacity: f64,
    pub overflowed: bool,
    /// Largest number of members sharing one depth from the sink.
    pub degree: usize,
}

impl PartitionReport {
    fn new(partition: &Partition, sites: &ResolvedSites, depths: &HashMap<String, usize>) -> Self {
        Self {
            id: partition.id(),
            site: sites.handle(partition.site_index()).map(str::to_string),
            jobs: partition.members().map(str::to_string).collect(),
            accumulated: partition.accumulated(),
            capacity: partition.capacity(),
            overflowed: partition.is_overflowed(),
            degree: degree(partition, depths),
        }
    }

    pub fn utilisation(&self) -> f64 {
        if self.capacity > 0.0 {
            self.accumulated / self.capacity
        } else {
            0.0
        }
    }
}

/// Breadth of the widest depth level among the partition's members.
fn degree(partition: &Partition, depths: &HashMap<String, usize>) -> usize {
    let mut per_depth: HashMap<usize, usize> = HashMap::new();
    for job in partition.members() {
        if let Some(&depth) = depths.get(job) {
            *per_depth.entry(depth).or_default() += 1;
        }
    }
    per_depth.into_values().max().unwrap_or(0)
}

/// Complete result of planning one workflow.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PlanReport {
    pub workflow: String,
    pub sink: String,
    pub policy: String,
    pub partitions: Vec<PartitionReport>,
    /// Partition-level dependencies, sorted.
    pub dependencies: Vec<PartitionDependency>,
    /// Number of graph edges kept inside a single partition.
    pub intra_edges: usize,
    pub engine: EngineStats,
    pub ledger: LedgerStats,
}

impl PlanReport {
    pub fn new(
        workflow: &str,
        sites: &ResolvedSites,
        outcome: &PartitionOutcome,
        subs: &SubWorkflows,
    ) -> Self {
        Self {
            workflow: workflow.to_string(),
            sink: outcome.sink.clone(),
            policy: outcome.policy.clone(),
            partitions: outcome
                .partitions
                .iter()
                .map(|p| PartitionReport::new(p, sites, &outcome.depths))
                .collect(),
            dependencies: subs.inter.clone(),
            intra_edges: subs.intra.len(),
            engine: outcome.stats.clone(),
            ledger: outcome.ledger.clone(),
        }
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn total_jobs(&self) -> usize {
        self.partitions.iter().map(|p| p.jobs.len()).sum()
    }

    /// Multi-line text rendering, one line per partition.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Workflow '{}' from '{}' ({}): {} partitions, {} jobs, {} cross-partition dependencies\n",
            self.workflow,
            self.sink,
            self.policy,
            self.num_partitions(),
            self.total_jobs(),
            self.dependencies.len(),
        );
        for p in &self.partitions {
            let _ = writeln!(
                out,
                "  [{}] site={} jobs={} size={:.2}/{:.2} ({:.0}%){} degree={}",
                p.id,
                p.site.as_deref().unwrap_or("-"),
                p.jobs.len(),
                p.accumulated,
                p.capacity,
                p.utilisation() * 100.0,
                if p.overflowed { " OVER" } else { "" },
                p.degree,
            );
        }
        for dep in &self.dependencies {
            let _ = writeln!(out, "  {} -> {}", dep.parent, dep.child);
        }
        out
    }

    pub fn to_json(&self) -> Result<String, PlannerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::SiteConfig;
    use capacity_ledger::CapacitySequence;
    use partition_planner::{BackwardPartitioner, UniformSize};
    use workflow_graph::Graph;

    fn sites() -> ResolvedSites {
        let cfg: Vec<SiteConfig> = ["isi", "ncsa"]
            .iter()
            .map(|h| SiteConfig {
                handle: h.to_string(),
                site_size: Some("3".into()),
                capacity: None,
                slots: None,
            })
            .collect();
        ResolvedSites::resolve(&cfg, 1.0, false).unwrap()
    }

    /// `a`, `b` and `c` all feed `d`.
    fn fan_in() -> Graph {
        let mut g = Graph::new();
        for id in ["a", "b", "c", "d"] {
            g.add_node(id, ());
        }
        for p in ["a", "b", "c"] {
            g.add_edge(p, "d").unwrap();
        }
        g
    }

    fn report() -> PlanReport {
        let g = fan_in();
        let sites = sites();
        let out = BackwardPartitioner::new(&g, "d", sites.capacities().clone(), UniformSize(1.0))
            .unwrap()
            .partition()
            .unwrap();
        let subs = SubWorkflows::derive(&g, &out);
        PlanReport::new("fan", &sites, &out, &subs)
    }

    #[test]
    fn test_report_labels_sites() {
        let r = report();
        assert_eq!(r.num_partitions(), 2);
        assert_eq!(r.total_jobs(), 4);
        assert_eq!(r.partitions[0].site.as_deref(), Some("isi"));
        assert_eq!(r.partitions[1].site.as_deref(), Some("ncsa"));
        assert_eq!(r.partitions[0].accumulated, 3.0);
    }

    #[test]
    fn test_degree_counts_widest_level() {
        let r = report();
        // d at depth 0 and two parents at depth 1 share the first partition.
        assert_eq!(r.partitions[0].degree, 2);
        assert_eq!(r.partitions[1].degree, 1);
    }

    #[test]
    fn test_summary_and_json() {
        let r = report();
        let s = r.summary();
        assert!(s.contains("Workflow 'fan'"));
        assert!(s.contains("site=isi"));
        assert!(s.contains("1 -> 0"));

        let v: serde_json::Value = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(v["partitions"][1]["site"], "ncsa");
        assert_eq!(v["dependencies"][0]["parent"], 1);
    }
}
