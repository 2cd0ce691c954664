use serde::Serialize;

/// Rank of a tier. Ordering follows the score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TierLevel {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Count,
    Miser,
}

/// One entry of the tier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub level: TierLevel,

    /// Display name shown on the client card
    pub name: &'static str,

    /// Lowest total score that qualifies for this tier (inclusive)
    pub min_points: u32,

    /// Card color (CSS color name or hex)
    pub color: &'static str,
}

/// The tier table, strictly increasing by `min_points`.
///
/// Immutable: resolution scans it without reordering.
pub static TIER_TABLE: [Tier; 7] = [
    Tier {
        level: TierLevel::Iron,
        name: "Ferro: Gastador",
        min_points: 0,
        color: "gray",
    },
    Tier {
        level: TierLevel::Bronze,
        name: "Bronze: Senhor do Cartão de Crédito",
        min_points: 100,
        color: "#CD7F32",
    },
    Tier {
        level: TierLevel::Silver,
        name: "Prata: Aficionado por Descontos",
        min_points: 200,
        color: "silver",
    },
    Tier {
        level: TierLevel::Gold,
        name: "Ouro: Saqueador de Lojas",
        min_points: 300,
        color: "gold",
    },
    Tier {
        level: TierLevel::Platinum,
        name: "Muquirana: Milionário de Cartão de Crédito",
        min_points: 400,
        color: "blue",
    },
    Tier {
        level: TierLevel::Count,
        name: "Conde Claus",
        min_points: 500,
        color: "green",
    },
    Tier {
        level: TierLevel::Miser,
        name: "Mão de Vaca: Mestre da Poupança",
        min_points: 600,
        color: "purple",
    },
];

/// Where a score sits in the tier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierStanding {
    /// Current tier (largest threshold not exceeding the score)
    pub tier: &'static Tier,

    /// The next tier up, `None` at the top
    pub next: Option<&'static Tier>,

    /// Points still missing to reach `next`, `None` at the top
    pub points_to_next: Option<u32>,
}
