//! Ordered, read-only table of `TierSpec`s.

use crate::error::{CatalogError, CatalogResult};
use crate::types::{TierName, TierSpec};

/// Image shared by every standard tier.
pub const DEFAULT_TEMPLATE: &str = "runpod/pytorch:2.0.1-py3.10-cuda11.8.0-devel-ubuntu22.04";

/// Tiers ordered by strictly increasing session ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct TierCatalog {
    tiers: Vec<TierSpec>,
}

impl TierCatalog {
    /// Build a catalog, validating that it is non-empty, has no duplicate
    /// names, and that ceilings strictly increase in the given order.
    pub fn new(tiers: Vec<TierSpec>) -> CatalogResult<Self> {
        if tiers.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (i, spec) in tiers.iter().enumerate() {
            if tiers[..i].iter().any(|t| t.name == spec.name) {
                return Err(CatalogError::Duplicate(spec.name.to_string()));
            }
            if i > 0 && spec.max_sessions <= tiers[i - 1].max_sessions {
                return Err(CatalogError::NotMonotonic {
                    tier: spec.name.to_string(),
                    ceiling: spec.max_sessions,
                    previous: tiers[i - 1].max_sessions,
                });
            }
        }

        Ok(Self { tiers })
    }

    /// The standard four-tier RunPod catalog.
    pub fn standard() -> Self {
        let tier = |name, gpu: &str, max_sessions, cost_per_hour| TierSpec {
            name,
            gpu_type: gpu.to_string(),
            max_sessions,
            cost_per_hour,
            template_id: DEFAULT_TEMPLATE.to_string(),
        };

        Self {
            tiers: vec![
                tier(TierName::Small, "RTX 3070", 30, 0.30),
                tier(TierName::Medium, "RTX 4070", 80, 0.45),
                tier(TierName::Large, "RTX 4080", 150, 0.60),
                tier(TierName::XLarge, "RTX 4090", 240, 0.69),
            ],
        }
    }

    /// Look up a tier by name.
    pub fn lookup(&self, name: TierName) -> CatalogResult<&TierSpec> {
        self.tiers
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CatalogError::UnknownTier(name.to_string()))
    }

    /// Look up a tier by its string name.
    pub fn lookup_str(&self, name: &str) -> CatalogResult<&TierSpec> {
        self.lookup(name.parse()?)
    }

    /// Tiers in ascending capacity order.
    pub fn tiers(&self) -> &[TierSpec] {
        &self.tiers
    }

    /// The highest-capacity tier.
    pub fn largest(&self) -> &TierSpec {
        // `new` and `standard` never produce an empty catalog.
        &self.tiers[self.tiers.len() - 1]
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: TierName, max_sessions: u32) -> TierSpec {
        TierSpec {
            name,
            gpu_type: "RTX 3070".to_string(),
            max_sessions,
            cost_per_hour: 0.30,
            template_id: DEFAULT_TEMPLATE.to_string(),
        }
    }

    #[test]
    fn standard_catalog_is_valid() {
        let standard = TierCatalog::standard();
        let rebuilt = TierCatalog::new(standard.tiers().to_vec()).unwrap();
        assert_eq!(rebuilt, standard);
    }

    #[test]
    fn standard_ceilings() {
        let catalog = TierCatalog::standard();
        let ceilings: Vec<u32> = catalog.tiers().iter().map(|t| t.max_sessions).collect();
        assert_eq!(ceilings, vec![30, 80, 150, 240]);
        assert_eq!(catalog.largest().name, TierName::XLarge);
    }

    #[test]
    fn lookup_by_name() {
        let catalog = TierCatalog::standard();
        let medium = catalog.lookup(TierName::Medium).unwrap();
        assert_eq!(medium.gpu_type, "RTX 4070");
        assert_eq!(medium.max_sessions, 80);

        let large = catalog.lookup_str("large").unwrap();
        assert_eq!(large.gpu_type, "RTX 4080");
    }

    #[test]
    fn lookup_unknown_string_fails() {
        let catalog = TierCatalog::standard();
        assert_eq!(
            catalog.lookup_str("gigantic"),
            Err(CatalogError::UnknownTier("gigantic".to_string()))
        );
    }

    #[test]
    fn lookup_tier_missing_from_custom_catalog_fails() {
        let catalog = TierCatalog::new(vec![spec(TierName::Small, 10)]).unwrap();
        assert_eq!(
            catalog.lookup(TierName::Large),
            Err(CatalogError::UnknownTier("large".to_string()))
        );
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(TierCatalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn non_increasing_ceilings_rejected() {
        let err = TierCatalog::new(vec![
            spec(TierName::Small, 30),
            spec(TierName::Medium, 30),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::NotMonotonic {
                tier: "medium".to_string(),
                ceiling: 30,
                previous: 30,
            }
        );
    }

    #[test]
    fn duplicate_tier_rejected() {
        let err = TierCatalog::new(vec![
            spec(TierName::Small, 30),
            spec(TierName::Small, 60),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::Duplicate("small".to_string()));
    }
}
