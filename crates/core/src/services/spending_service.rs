use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::spending::CategoryShare;
use crate::models::transaction::{Transaction, TransactionType};

/// Expense breakdowns for display. Pure business logic.
pub struct SpendingService;

impl SpendingService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of all values of the given kind.
    #[must_use]
    pub fn total_of(&self, transactions: &[Transaction], kind: TransactionType) -> Decimal {
        transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.value)
            .sum()
    }

    /// Expense totals per category with their share of all expenses.
    ///
    /// Sorted by total (largest first), then by category name.
    /// Percentages are 0 when nothing was spent.
    #[must_use]
    pub fn category_breakdown(&self, transactions: &[Transaction]) -> Vec<CategoryShare> {
        self.breakdown(transactions.iter().filter(|t| t.is_expense()))
    }

    /// Same as [`category_breakdown`](Self::category_breakdown), restricted to one client.
    #[must_use]
    pub fn category_breakdown_for(
        &self,
        transactions: &[Transaction],
        client_id: Uuid,
    ) -> Vec<CategoryShare> {
        self.breakdown(
            transactions
                .iter()
                .filter(|t| t.is_expense() && t.client_id == Some(client_id)),
        )
    }

    fn breakdown<'a>(&self, expenses: impl Iterator<Item = &'a Transaction>) -> Vec<CategoryShare> {
        let mut totals: HashMap<&str, (Decimal, usize)> = HashMap::new();
        let mut grand_total = Decimal::ZERO;

        for tx in expenses {
            let entry = totals.entry(tx.category.as_str()).or_insert((Decimal::ZERO, 0));
            entry.0 += tx.value;
            entry.1 += 1;
            grand_total += tx.value;
        }

        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(category, (total, count))| CategoryShare {
                category: category.to_string(),
                total,
                percentage: percentage_of(total, grand_total),
                count,
            })
            .collect();

        shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
        shares
    }
}

impl Default for SpendingService {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
