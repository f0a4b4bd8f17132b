// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Planner configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! sink = "mAdd"
//! policy = "fan-out"
//! fan_out_threshold = 2
//! fan_in_threshold = 10
//! # Optional; each policy has its own default.
//! ordering = "strict"
//! oversize = "fail"
//! reorder = true
//! size_scale = 1e8
//!
//! [[sites]]
//! handle = "isi"
//! site_size = "2.5"
//! slots = 16
//!
//! [[sites]]
//! handle = "ncsa"
//! capacity = "40G"
//! ```

use crate::sites::{ResolvedSites, SiteConfig};
use crate::PlannerError;
use capacity_ledger::DEFAULT_SITE_SIZE_SCALE;
use partition_planner::{
    BoundaryPolicy, ChildOrdering, OversizePolicy, PolicyKind, DEFAULT_FAN_IN_THRESHOLD,
    DEFAULT_FAN_OUT_THRESHOLD,
};
use std::path::Path;

/// Configuration for one planning run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Job to partition backwards from. Defaults to the workflow's rear job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink: Option<String>,
    /// Boundary policy: `"greedy"`, `"fan-out"`, `"fan-in"` or `"closure"`.
    pub policy: PolicyKind,
    /// Children above which the fan-out policy defers a job.
    pub fan_out_threshold: usize,
    /// Parents above which the fan-in policy closes the partition.
    pub fan_in_threshold: usize,
    /// Overrides the ordering the policy prefers: strict for greedy and
    /// fan-in, relaxed for fan-out and closure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<ChildOrdering>,
    pub oversize: OversizePolicy,
    /// Main-loop iteration cap. Derived from the graph when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_budget: Option<usize>,
    /// Consume the largest sites first.
    pub reorder: bool,
    /// Multiplier applied to every `site_size`.
    pub size_scale: f64,
    pub sites: Vec<SiteConfig>,
}

impl PlannerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PlannerError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PlannerError> {
        toml::from_str(toml_str)
            .map_err(|e| PlannerError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, PlannerError> {
        toml::to_string_pretty(self)
            .map_err(|e| PlannerError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Creates the boundary policy specified by this config.
    pub fn create_policy<C>(&self) -> Box<dyn BoundaryPolicy<C>> {
        self.policy
            .build(self.fan_out_threshold, self.fan_in_threshold)
    }

    /// Resolves the configured sites into the capacity sequence the
    /// partitioner consumes.
    pub fn capacities(&self) -> Result<ResolvedSites, PlannerError> {
        if !self.size_scale.is_finite() || self.size_scale <= 0.0 {
            return Err(PlannerError::ConfigError(format!(
                "size_scale must be a positive number, got {}",
                self.size_scale
            )));
        }
        ResolvedSites::resolve(&self.sites, self.size_scale, self.reorder)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sink: None,
            policy: PolicyKind::default(),
            fan_out_threshold: DEFAULT_FAN_OUT_THRESHOLD,
            fan_in_threshold: DEFAULT_FAN_IN_THRESHOLD,
            ordering: None,
            oversize: OversizePolicy::default(),
            iteration_budget: None,
            reorder: false,
            size_scale: DEFAULT_SITE_SIZE_SCALE,
            sites: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = PlannerConfig::default();
        assert_eq!(c.policy, PolicyKind::Greedy);
        assert_eq!(c.fan_out_threshold, 2);
        assert_eq!(c.fan_in_threshold, 10);
        assert_eq!(c.size_scale, 1e8);
        assert_eq!(c.ordering, None);
        assert!(c.sites.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
sink = "merge"
policy = "fan-in"
fan_in_threshold = 3
ordering = "relaxed"
oversize = "allow-singleton"
iteration_budget = 500
reorder = true

[[sites]]
handle = "local"
site_size = "100"

[[sites]]
handle = "isi"
site_size = "2"
slots = 8
"#;
        let c = PlannerConfig::from_toml(toml).unwrap();
        assert_eq!(c.sink.as_deref(), Some("merge"));
        assert_eq!(c.policy, PolicyKind::FanIn);
        assert_eq!(c.fan_in_threshold, 3);
        assert_eq!(c.fan_out_threshold, 2);
        assert_eq!(c.ordering, Some(ChildOrdering::Relaxed));
        assert_eq!(c.oversize, OversizePolicy::AllowSingleton);
        assert_eq!(c.iteration_budget, Some(500));
        assert!(c.reorder);
        assert_eq!(c.sites.len(), 2);
        assert_eq!(c.sites[1].slots, Some(8));

        let sites = c.capacities().unwrap();
        assert_eq!(sites.handles(), ["isi"]);
        assert_eq!(sites.capacities().total(), 2e8);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = PlannerConfig {
            policy: PolicyKind::Closure,
            sites: vec![SiteConfig {
                handle: "isi".into(),
                site_size: Some("1.5".into()),
                capacity: None,
                slots: None,
            }],
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = PlannerConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_create_policy() {
        let c = PlannerConfig {
            policy: PolicyKind::FanOut,
            ..Default::default()
        };
        let p: Box<dyn BoundaryPolicy<()>> = c.create_policy();
        assert_eq!(p.name(), "fan-out-deferral");
        assert_eq!(p.preferred_ordering(), ChildOrdering::Relaxed);
    }

    #[test]
    fn test_ordering_override_roundtrip() {
        let c = PlannerConfig::from_toml("policy = \"closure\"\nordering = \"strict\"").unwrap();
        assert_eq!(c.ordering, Some(ChildOrdering::Strict));
        let back = PlannerConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back.ordering, Some(ChildOrdering::Strict));
        assert!(!PlannerConfig::default().to_toml().unwrap().contains("ordering"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = PlannerConfig::from_toml("policy = \"bogus\"").unwrap_err();
        assert!(matches!(err, PlannerError::ConfigError(_)));
    }

    #[test]
    fn test_bad_scale() {
        let c = PlannerConfig {
            size_scale: 0.0,
            ..Default::default()
        };
        assert!(matches!(c.capacities(), Err(PlannerError::ConfigError(_))));
    }
}
