use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned when a transaction is recorded without one.
pub const DEFAULT_CATEGORY: &str = "Outros";

/// Kind of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out; the only kind that affects scoring
    Expense,
    /// Balance overwritten with a new absolute value
    Reset,
}

impl TransactionType {
    /// Parse a stored type code.
    ///
    /// Accepts the single-letter codes written by older app versions
    /// (`A` income, `B` expense, `C` reset) as well as the full names,
    /// case-insensitively. Anything else is unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "a" | "income" => Some(TransactionType::Income),
            "b" | "expense" => Some(TransactionType::Expense),
            "c" | "reset" => Some(TransactionType::Reset),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
            TransactionType::Reset => write!(f, "Reset"),
        }
    }
}

/// A single recorded money movement.
///
/// Transactions reference their client by the client's stable `id`,
/// never by display name, so renaming a client keeps its history attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Income, Expense or Reset
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Amount moved (never negative)
    pub value: Decimal,

    /// Free-form label, e.g. "Lar", "Transporte"
    pub category: String,

    /// When the transaction happened, with the offset it was recorded in.
    pub date: DateTime<FixedOffset>,

    /// Owning client, or `None` if unassigned
    #[serde(default)]
    pub client_id: Option<Uuid>,

    /// Optional free-text comment
    #[serde(default)]
    pub comment: Option<String>,
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        value: Decimal,
        category: impl Into<String>,
        date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value,
            category: normalize_category(category.into()),
            date,
            client_id: None,
            comment: None,
        }
    }

    /// Convenience constructor for an expense.
    pub fn expense(value: Decimal, category: impl Into<String>, date: DateTime<FixedOffset>) -> Self {
        Self::new(TransactionType::Expense, value, category, date)
    }

    /// Convenience constructor for an income.
    pub fn income(value: Decimal, category: impl Into<String>, date: DateTime<FixedOffset>) -> Self {
        Self::new(TransactionType::Income, value, category, date)
    }

    /// Assign this transaction to a client.
    pub fn for_client(mut self, client_id: Uuid) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Attach a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Calendar day this transaction is bucketed under.
    /// This is the date in the transaction's own offset, with no timezone conversion.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Trim a category label, falling back to [`DEFAULT_CATEGORY`] when blank.
pub fn normalize_category(category: String) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else if trimmed.len() == category.len() {
        category
    } else {
        trimmed.to_string()
    }
}
