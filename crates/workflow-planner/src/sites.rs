// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution sites and the capacity sequence derived from them.

use crate::PlannerError;
use capacity_ledger::{CapacitySequence, SiteCapacity};

/// Handle of the submit host. It never executes partitions.
pub const LOCAL_SITE: &str = "local";

/// One `[[sites]]` entry of the planner configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SiteConfig {
    pub handle: String,
    /// Declared site size, a plain number scaled by
    /// [`PlannerConfig::size_scale`](crate::PlannerConfig::size_scale).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_size: Option<String>,
    /// Explicit capacity such as `"40G"`; takes precedence over `site_size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    /// Job slots advertised by the site. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<u32>,
}

impl SiteConfig {
    /// Resolves this site's capacity.
    pub fn resolve(&self, scale: f64) -> Result<SiteCapacity, PlannerError> {
        match (&self.capacity, &self.site_size) {
            (Some(capacity), _) => Ok(SiteCapacity::parse(capacity)?),
            (None, Some(size)) => Ok(SiteCapacity::from_site_size(size, scale)?),
            (None, None) => Err(PlannerError::ConfigError(format!(
                "site '{}' has neither 'site_size' nor 'capacity'",
                self.handle
            ))),
        }
    }
}

/// Sites in the order their capacities are consumed.
#[derive(Debug, Clone)]
pub struct ResolvedSites {
    handles: Vec<String>,
    capacities: CapacitySequence,
}

impl ResolvedSites {
    /// Resolves every non-local site. With `reorder`, the largest capacity
    /// comes first; sites of equal capacity keep their configured order.
    pub fn resolve(sites: &[SiteConfig], scale: f64, reorder: bool) -> Result<Self, PlannerError> {
        let mut resolved = Vec::with_capacity(sites.len());
        for site in sites.iter().filter(|s| s.handle != LOCAL_SITE) {
            resolved.push((site.handle.clone(), site.resolve(scale)?));
        }
        if reorder {
            resolved.sort_by(|a, b| b.1.value().total_cmp(&a.1.value()));
        }

        let (handles, capacities): (Vec<_>, Vec<_>) = resolved.into_iter().unzip();
        if handles.is_empty() {
            return Err(PlannerError::ConfigError(
                "no execution sites configured (the 'local' site is ignored)".to_string(),
            ));
        }
        tracing::debug!(sites = ?handles, reorder, "resolved execution sites");
        Ok(Self {
            handles,
            capacities: CapacitySequence::new(capacities)?,
        })
    }

    pub fn capacities(&self) -> &CapacitySequence {
        &self.capacities
    }

    /// Handle of the site at `index` in consumption order.
    pub fn handle(&self, index: usize) -> Option<&str> {
        self.handles.get(index).map(String::as_str)
    }

    pub fn handles(&self) -> &[String] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
