use thiserror::Error;

/// Unified error type for the entire budget-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Scoring itself never fails: malformed records are excluded and zero
/// goals are reported through `ScoreStatus`, not through this type.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Snapshot decoding ───────────────────────────────────────────
    #[error("Invalid record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("A client named '{0}' already exists")]
    DuplicateClient(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
