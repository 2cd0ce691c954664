use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::spending::ClientKey;
use crate::services::goal_service::GoalService;

/// A budget profile that expenses are tracked against.
///
/// The daily goal is not stored; it is derived from `monthly_income` on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier, generated at creation and never changed
    pub id: Uuid,

    /// Display name (trimmed, unique within a tracker)
    pub name: String,

    /// Declared monthly income (never negative, zero when unknown)
    #[serde(default)]
    pub monthly_income: Decimal,

    #[serde(default)]
    pub birthdate: Option<NaiveDate>,

    /// Day the profile was created
    pub registration_date: NaiveDate,

    /// Card color chosen by the presentation layer
    #[serde(default)]
    pub color: Option<String>,
}

impl Client {
    /// Create a client registered today. Negative income is clamped to zero.
    pub fn new(name: impl Into<String>, monthly_income: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            monthly_income: monthly_income.max(Decimal::ZERO),
            birthdate: None,
            registration_date: Utc::now().date_naive(),
            color: None,
        }
    }

    pub fn with_birthdate(mut self, birthdate: NaiveDate) -> Self {
        self.birthdate = Some(birthdate);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Daily spending goal under the default 30-day month.
    ///
    /// Ignores any custom `ScoringConfig::days_per_month`; use
    /// `ScoreService::daily_goal` or `BudgetTracker::daily_goal` for the
    /// goal that scoring actually uses.
    #[must_use]
    pub fn daily_goal(&self) -> Decimal {
        GoalService::new().compute_daily_goal(self.monthly_income)
    }

    /// Whether this client goes by `name`, ignoring case (including accented letters).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    /// Aggregation key for this client's transactions.
    #[must_use]
    pub fn key(&self) -> ClientKey {
        ClientKey::Client(self.id)
    }
}

/// Compare two display names ignoring case, for any alphabet ("José" == "JOSÉ").
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
