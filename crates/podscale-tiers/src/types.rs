//! Domain types for GPU pod tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Provider-assigned identifier for a running pod.
pub type InstanceId = String;

/// Hours in a month of always-on operation.
pub const HOURS_PER_MONTH: f64 = 720.0;

/// Hours in a month of business-day operation (22 days × 12 hours).
pub const BUSINESS_HOURS_PER_MONTH: f64 = 264.0;

/// Name of a pod tier, ordered by capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierName {
    Small,
    Medium,
    Large,
    XLarge,
}

impl TierName {
    /// All tier names in ascending capacity order.
    pub const ALL: [TierName; 4] = [
        TierName::Small,
        TierName::Medium,
        TierName::Large,
        TierName::XLarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierName::Small => "small",
            TierName::Medium => "medium",
            TierName::Large => "large",
            TierName::XLarge => "xlarge",
        }
    }
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(TierName::Small),
            "medium" => Ok(TierName::Medium),
            "large" => Ok(TierName::Large),
            "xlarge" => Ok(TierName::XLarge),
            _ => Err(CatalogError::UnknownTier(s.to_string())),
        }
    }
}

/// Label for an optional tier, printing `none` for no capacity.
pub fn tier_label(tier: Option<TierName>) -> &'static str {
    tier.map_or("none", |t| t.as_str())
}

/// A catalog entry describing how to provision one tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierSpec {
    pub name: TierName,
    /// GPU class requested from the provider (e.g. "RTX 4090").
    pub gpu_type: String,
    /// Maximum concurrent sessions one pod of this tier serves.
    pub max_sessions: u32,
    /// On-demand price in USD per hour.
    pub cost_per_hour: f64,
    /// Container image the pod boots from.
    pub template_id: String,
}

impl TierSpec {
    /// Estimated monthly cost when the pod runs around the clock.
    pub fn monthly_cost(&self) -> f64 {
        self.cost_per_hour * HOURS_PER_MONTH
    }

    /// Estimated monthly cost when the pod only runs on business days.
    pub fn business_days_cost(&self) -> f64 {
        self.cost_per_hour * BUSINESS_HOURS_PER_MONTH
    }
}
