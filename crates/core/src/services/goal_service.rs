use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Default divisor turning a monthly income into a daily goal.
pub const DEFAULT_DAYS_PER_MONTH: u32 = 30;

/// Derives a client's daily spending goal from their monthly income.
///
/// Pure business logic. No I/O.
#[derive(Debug, Clone)]
pub struct GoalService {
    days_per_month: Decimal,
}

impl GoalService {
    pub fn new() -> Self {
        Self::with_days_per_month(DEFAULT_DAYS_PER_MONTH)
    }

    /// A zero divisor is bumped to one day so a goal is always defined.
    pub fn with_days_per_month(days_per_month: u32) -> Self {
        Self {
            days_per_month: Decimal::from(days_per_month.max(1)),
        }
    }

    /// `round(monthly_income / days_per_month)` in whole currency units, half-up.
    ///
    /// Zero or negative income yields a goal of zero. Callers must treat a
    /// zero goal as "nothing to score against" and never divide by it.
    #[must_use]
    pub fn compute_daily_goal(&self, monthly_income: Decimal) -> Decimal {
        if monthly_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_half_up(monthly_income / self.days_per_month)
    }

    /// Parse a monthly income typed by the user.
    ///
    /// Accepts a comma as decimal separator. Non-numeric and negative
    /// input is clamped to zero instead of being rejected.
    #[must_use]
    pub fn parse_monthly_income(&self, input: &str) -> Decimal {
        let normalized = input.trim().replace(',', ".");
        match Decimal::from_str(&normalized) {
            Ok(value) if value >= Decimal::ZERO => value,
            Ok(value) => {
                debug!("Negative monthly income {value} clamped to 0");
                Decimal::ZERO
            }
            Err(_) => {
                debug!("Non-numeric monthly income '{input}' treated as 0");
                Decimal::ZERO
            }
        }
    }
}

impl Default for GoalService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to the nearest integer, with halves going towards positive infinity
/// (`2.5 -> 3`, `-2.5 -> -2`).
#[must_use]
pub fn round_half_up(value: Decimal) -> Decimal {
    match value.checked_add(Decimal::new(5, 1)) {
        Some(shifted) => shifted.floor(),
        None => value.floor(),
    }
}
