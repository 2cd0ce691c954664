use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Grouping key for expenses: the owning client, or the unassigned bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClientKey {
    /// Transactions recorded without a client. Never resolves to a client.
    Unassigned,
    Client(Uuid),
}

impl From<Option<Uuid>> for ClientKey {
    fn from(client_id: Option<Uuid>) -> Self {
        match client_id {
            Some(id) => ClientKey::Client(id),
            None => ClientKey::Unassigned,
        }
    }
}

/// Expense totals per client and calendar day.
///
/// Backed by ordered maps, so iteration is deterministic and each
/// client's days come out oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyExpenses {
    buckets: BTreeMap<ClientKey, BTreeMap<NaiveDate, Decimal>>,
}

impl DailyExpenses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the bucket for `(key, day)`.
    pub fn add(&mut self, key: ClientKey, day: NaiveDate, value: Decimal) {
        *self
            .buckets
            .entry(key)
            .or_default()
            .entry(day)
            .or_insert(Decimal::ZERO) += value;
    }

    /// Total for a single bucket, if any expense was recorded there.
    #[must_use]
    pub fn get(&self, key: ClientKey, day: NaiveDate) -> Option<Decimal> {
        self.buckets.get(&key)?.get(&day).copied()
    }

    /// All `(day, total)` pairs of one key, oldest first.
    pub fn days_for(&self, key: ClientKey) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.buckets
            .get(&key)
            .into_iter()
            .flat_map(|days| days.iter().map(|(day, sum)| (*day, *sum)))
    }

    /// Every bucket as `((key, day), total)`.
    pub fn iter(&self) -> impl Iterator<Item = ((ClientKey, NaiveDate), Decimal)> + '_ {
        self.buckets.iter().flat_map(|(key, days)| {
            days.iter().map(move |(day, sum)| ((*key, *day), *sum))
        })
    }

    /// Keys that have at least one bucket.
    pub fn keys(&self) -> impl Iterator<Item = ClientKey> + '_ {
        self.buckets.keys().copied()
    }

    /// Number of `(key, day)` buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Expense total of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,

    /// Sum of expense values in this category
    pub total: Decimal,

    /// Share of all expenses, in percent with two decimal places
    pub percentage: Decimal,

    /// Number of expenses in this category
    pub count: usize,
}
