use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::models::client::Client;
use crate::models::score::{ScoreRecord, ScoreStatus};
use crate::models::settings::{FloorPolicy, ScoringConfig};
use crate::models::spending::{ClientKey, DailyExpenses};
use crate::models::transaction::Transaction;
use crate::services::aggregation_service::AggregationService;
use crate::services::goal_service::{round_half_up, GoalService};
use crate::services::tier_service::TierService;

/// Turns daily expense totals into adherence scores and tiers.
///
/// Every call recomputes from the given snapshot; nothing is cached.
pub struct ScoreService {
    config: ScoringConfig,
    goal_service: GoalService,
    aggregation_service: AggregationService,
    tier_service: TierService,
}

impl ScoreService {
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self {
            goal_service: GoalService::with_days_per_month(config.days_per_month),
            aggregation_service: AggregationService::new(),
            tier_service: TierService::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Daily goal of a client under this service's configuration.
    #[must_use]
    pub fn daily_goal(&self, client: &Client) -> Decimal {
        self.goal_service.compute_daily_goal(client.monthly_income)
    }

    /// Score delta of a single day.
    ///
    /// `round((goal - spent) / goal * 100)`, clamped below at
    /// `min_daily_delta`. Returns `None` when the goal is zero.
    #[must_use]
    pub fn day_delta(&self, daily_goal: Decimal, day_sum: Decimal) -> Option<i32> {
        if daily_goal <= Decimal::ZERO {
            return None;
        }
        let floor = self.config.min_daily_delta;

        // Overflow here means the day was overspent by an absurd factor.
        let Some(ratio) = (daily_goal - day_sum)
            .checked_div(daily_goal)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        else {
            return Some(floor);
        };

        let delta = round_half_up(ratio).max(Decimal::from(floor));
        Some(delta.to_i32().unwrap_or(i32::MAX))
    }

    /// Total score of one client from pre-aggregated expenses.
    #[must_use]
    pub fn accumulate_score(&self, expenses: &DailyExpenses, client: &Client) -> u32 {
        self.tally(expenses, client.key(), self.daily_goal(client)).0
    }

    /// Score a single client against a transaction snapshot.
    #[must_use]
    pub fn compute_client_score(&self, client: &Client, transactions: &[Transaction]) -> ScoreRecord {
        let expenses = self.aggregation_service.aggregate_daily_expenses(transactions);
        self.score_from_expenses(client, &expenses)
    }

    /// Score every client, one record per client in input order.
    /// The transactions are aggregated once for the whole batch.
    #[must_use]
    pub fn compute_all_scores(
        &self,
        clients: &[Client],
        transactions: &[Transaction],
    ) -> Vec<ScoreRecord> {
        let expenses = self.aggregation_service.aggregate_daily_expenses(transactions);

        let known: HashSet<ClientKey> = clients.iter().map(Client::key).collect();
        let orphaned = expenses
            .keys()
            .filter(|k| *k != ClientKey::Unassigned && !known.contains(k))
            .count();
        if orphaned > 0 {
            debug!("Ignoring expenses of {orphaned} unknown client reference(s)");
        }

        clients
            .iter()
            .map(|client| self.score_from_expenses(client, &expenses))
            .collect()
    }

    /// Build the full record for `client` from pre-aggregated expenses.
    #[must_use]
    pub fn score_from_expenses(&self, client: &Client, expenses: &DailyExpenses) -> ScoreRecord {
        let goal = self.daily_goal(client);
        let status = if goal > Decimal::ZERO {
            ScoreStatus::Scored
        } else {
            debug!("Client '{}' has no daily goal; score unavailable", client.name);
            ScoreStatus::Unavailable
        };

        let (total_points, days_scored) = self.tally(expenses, client.key(), goal);

        ScoreRecord {
            client_id: client.id,
            client_name: client.name.clone(),
            total_points,
            status,
            days_scored,
            standing: self.tier_service.resolve_tier(total_points),
        }
    }

    /// Walk a client's days oldest first, returning `(total, days_scored)`.
    fn tally(&self, expenses: &DailyExpenses, key: ClientKey, daily_goal: Decimal) -> (u32, usize) {
        if daily_goal <= Decimal::ZERO {
            return (0, 0);
        }

        let mut total: i64 = 0;
        let mut days_scored = 0;

        for (_, day_sum) in expenses.days_for(key) {
            let Some(delta) = self.day_delta(daily_goal, day_sum) else {
                continue;
            };
            total += i64::from(delta);
            days_scored += 1;
            if self.config.floor_policy == FloorPolicy::PerStep {
                total = total.max(0);
            }
        }

        (u32::try_from(total.max(0)).unwrap_or(u32::MAX), days_scored)
    }
}

impl Default for ScoreService {
    fn default() -> Self {
        Self::new()
    }
}
