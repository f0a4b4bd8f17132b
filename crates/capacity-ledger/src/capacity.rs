// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Site capacities and their parsing.
//!
//! A [`SiteCapacity`] is the size ceiling of one partition opened against a
//! site. Capacities are plain `f64` quantities in the same unit as the job
//! sizes the engine charges; the parser only helps with the common byte
//! suffixes.

use crate::LedgerError;
use std::fmt;

/// Scale applied to a site's declared `SITESIZE` attribute.
pub const DEFAULT_SITE_SIZE_SCALE: f64 = 1e8;

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;
const TIB: f64 = GIB * 1024.0;

/// The size ceiling of a single site.
///
/// # Parsing
/// Accepts a plain number or a number followed by a binary suffix:
/// - `"512M"` or `"512MB"` → 512 × 1024²
/// - `"100G"` or `"100GB"` → 100 × 1024³
/// - `"1.5T"` → 1.5 × 1024⁴
/// - `"2048K"`, `"2048KB"`, `"300"` → as written
///
/// # Examples
/// ```
/// use capacity_ledger::SiteCapacity;
///
/// let c = SiteCapacity::parse("1G").unwrap();
/// assert_eq!(c.value(), 1024.0 * 1024.0 * 1024.0);
///
/// let c = SiteCapacity::from_site_size("3", 1e8).unwrap();
/// assert_eq!(c.value(), 3e8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SiteCapacity {
    value: f64,
}

impl SiteCapacity {
    /// Creates a capacity, rejecting zero, negative and non-finite values.
    pub fn new(value: f64) -> Result<Self, LedgerError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(LedgerError::InvalidCapacity { value });
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Builds a capacity from a site's declared size attribute, multiplied
    /// by `scale`.
    pub fn from_site_size(attribute: &str, scale: f64) -> Result<Self, LedgerError> {
        let declared: f64 = attribute.trim().parse().map_err(|_| LedgerError::Parse {
            input: attribute.to_string(),
            reason: "site size must be a number".to_string(),
        })?;
        Self::new(declared * scale)
    }

    /// Parses a human-readable capacity string. Case-insensitive.
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::Parse {
                input: s.to_string(),
                reason: "empty string".to_string(),
            });
        }

        let upper = trimmed.to_uppercase();
        let (digits, multiplier) = [
            ("TB", TIB),
            ("T", TIB),
            ("GB", GIB),
            ("G", GIB),
            ("MB", MIB),
            ("M", MIB),
            ("KB", KIB),
            ("K", KIB),
            ("B", 1.0),
        ]
        .iter()
        .find(|(suffix, _)| upper.ends_with(suffix))
        .map(|(suffix, m)| (&trimmed[..trimmed.len() - suffix.len()], *m))
        .unwrap_or((trimmed, 1.0));

        let number: f64 = digits.trim().parse().map_err(|_| LedgerError::Parse {
            input: s.to_string(),
            reason: "expected a number followed by an optional suffix (K, M, G, T)".to_string(),
        })?;

        Self::new(number * multiplier)
    }
}

impl TryFrom<f64> for SiteCapacity {
    type Error = LedgerError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SiteCapacity> for f64 {
    fn from(c: SiteCapacity) -> Self {
        c.value
    }
}

impl fmt::Display for SiteCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value;
        if v >= TIB && v % TIB == 0.0 {
            write!(f, "{} TB", v / TIB)
        } else if v >= GIB && v % GIB == 0.0 {
            write!(f, "{} GB", v / GIB)
        } else if v >= MIB && v % MIB == 0.0 {
            write!(f, "{} MB", v / MIB)
        } else if v >= KIB && v % KIB == 0.0 {
            write!(f, "{} KB", v / KIB)
        } else {
            write!(f, "{v}")
        }
    }
}
