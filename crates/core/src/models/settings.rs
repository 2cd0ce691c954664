use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// When the zero floor is applied to a client's running score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloorPolicy {
    /// Clamp the running total to zero after every day.
    /// Days are processed oldest first, and that order affects the result.
    #[default]
    PerStep,
    /// Sum every day's delta, then clamp the final total to zero.
    /// Independent of day order.
    FinalOnly,
}

/// Tunable constants of the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Divisor turning monthly income into a daily goal.
    pub days_per_month: u32,

    /// Lowest delta a single day can contribute (a non-positive number).
    pub min_daily_delta: i32,

    pub floor_policy: FloorPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            days_per_month: 30,
            min_daily_delta: -24,
            floor_policy: FloorPolicy::PerStep,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.days_per_month == 0 {
            return Err(CoreError::ValidationError(
                "days_per_month must be greater than zero".into(),
            ));
        }
        if self.min_daily_delta > 0 {
            return Err(CoreError::ValidationError(format!(
                "min_daily_delta must not be positive (got {})",
                self.min_daily_delta
            )));
        }
        Ok(())
    }
}
