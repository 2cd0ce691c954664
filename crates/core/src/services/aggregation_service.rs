use log::warn;
use rust_decimal::Decimal;

use crate::models::spending::{ClientKey, DailyExpenses};
use crate::models::transaction::Transaction;

/// Groups transactions into per-client, per-day expense totals.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Sum expense values by `(client, calendar day)`.
    ///
    /// Income and Reset transactions are ignored. Unassigned expenses land
    /// under [`ClientKey::Unassigned`]. The result does not depend on the
    /// order of `transactions`.
    #[must_use]
    pub fn aggregate_daily_expenses(&self, transactions: &[Transaction]) -> DailyExpenses {
        let mut expenses = DailyExpenses::new();

        for tx in transactions.iter().filter(|t| t.is_expense()) {
            if tx.value < Decimal::ZERO {
                warn!("Skipping expense {} with negative value {}", tx.id, tx.value);
                continue;
            }
            expenses.add(ClientKey::from(tx.client_id), tx.day(), tx.value);
        }

        expenses
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
