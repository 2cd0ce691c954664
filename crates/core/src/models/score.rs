use serde::Serialize;
use uuid::Uuid;

use super::tier::TierStanding;

/// Whether a score could be computed for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreStatus {
    /// The client has a non-zero daily goal and was scored.
    Scored,
    /// The client has no declared income, so there is no goal to score against.
    Unavailable,
}

/// Adherence score of one client, derived from the current transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub client_id: Uuid,

    /// Client name at the time of scoring (display only)
    pub client_name: String,

    /// Accumulated points, never negative
    pub total_points: u32,

    pub status: ScoreStatus,

    /// Number of days with expenses that contributed a delta
    pub days_scored: usize,

    /// Resolved tier and distance to the next one
    pub standing: TierStanding,
}

impl ScoreRecord {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == ScoreStatus::Scored
    }

    /// Name of the resolved tier.
    #[must_use]
    pub fn tier_name(&self) -> &'static str {
        self.standing.tier.name
    }

    /// Card color of the resolved tier.
    #[must_use]
    pub fn tier_color(&self) -> &'static str {
        self.standing.tier.color
    }
}
