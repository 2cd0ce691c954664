use crate::models::tier::{Tier, TierLevel, TierStanding, TIER_TABLE};

/// Maps a total score onto the tier table.
pub struct TierService {
    table: &'static [Tier],
}

impl TierService {
    pub fn new() -> Self {
        Self { table: &TIER_TABLE }
    }

    /// The full table, lowest tier first.
    #[must_use]
    pub fn tiers(&self) -> &'static [Tier] {
        self.table
    }

    /// Find the tier with the largest threshold not exceeding `total_points`.
    ///
    /// A score exactly on a threshold belongs to that (higher) tier.
    /// The scan compares thresholds only, so it does not rely on the
    /// table's storage order.
    #[must_use]
    pub fn resolve_tier(&self, total_points: u32) -> TierStanding {
        let table = self.table;
        let tier = table
            .iter()
            .filter(|t| t.min_points <= total_points)
            .max_by_key(|t| t.min_points)
            .unwrap_or(&TIER_TABLE[0]);

        let next = table
            .iter()
            .filter(|t| t.min_points > total_points)
            .min_by_key(|t| t.min_points);

        TierStanding {
            tier,
            next,
            points_to_next: next.map(|n| n.min_points - total_points),
        }
    }

    /// Look up a tier by level.
    #[must_use]
    pub fn tier(&self, level: TierLevel) -> Option<&'static Tier> {
        let table = self.table;
        table.iter().find(|t| t.level == level)
    }
}

impl Default for TierService {
    fn default() -> Self {
        Self::new()
    }
}
