//! Sizing policy: session count to required tier.

use podscale_tiers::{TierCatalog, TierName};

/// The tier needed to serve `sessions` concurrent sessions.
///
/// Returns `None` for zero sessions. Otherwise returns the smallest tier
/// whose ceiling covers the load, or the largest tier when the load
/// exceeds every ceiling.
pub fn required_tier(catalog: &TierCatalog, sessions: u32) -> Option<TierName> {
    if sessions == 0 {
        return None;
    }

    let tier = catalog
        .tiers()
        .iter()
        .find(|t| sessions <= t.max_sessions)
        .unwrap_or_else(|| catalog.largest());

    Some(tier.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sessions_needs_no_tier() {
        assert_eq!(required_tier(&TierCatalog::standard(), 0), None);
    }

    #[test]
    fn tier_boundaries() {
        let catalog = TierCatalog::standard();
        assert_eq!(required_tier(&catalog, 1), Some(TierName::Small));
        assert_eq!(required_tier(&catalog, 30), Some(TierName::Small));
        assert_eq!(required_tier(&catalog, 31), Some(TierName::Medium));
        assert_eq!(required_tier(&catalog, 80), Some(TierName::Medium));
        assert_eq!(required_tier(&catalog, 81), Some(TierName::Large));
        assert_eq!(required_tier(&catalog, 150), Some(TierName::Large));
        assert_eq!(required_tier(&catalog, 151), Some(TierName::XLarge));
        assert_eq!(required_tier(&catalog, 240), Some(TierName::XLarge));
    }

    #[test]
    fn load_above_top_ceiling_stays_on_largest_tier() {
        let catalog = TierCatalog::standard();
        assert_eq!(required_tier(&catalog, 241), Some(TierName::XLarge));
        assert_eq!(required_tier(&catalog, 10_000), Some(TierName::XLarge));
        assert_eq!(required_tier(&catalog, u32::MAX), Some(TierName::XLarge));
    }

    #[test]
    fn more_load_never_needs_a_smaller_tier() {
        let catalog = TierCatalog::standard();
        let mut previous = required_tier(&catalog, 0);
        for sessions in 1..=500 {
            let tier = required_tier(&catalog, sessions);
            assert!(tier >= previous, "tier shrank at {sessions} sessions");
            assert_eq!(tier, required_tier(&catalog, sessions));
            previous = tier;
        }
    }
}
