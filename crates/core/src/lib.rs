pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::{DateTime, FixedOffset};
use log::debug;
use models::{
    client::Client,
    score::ScoreRecord,
    settings::ScoringConfig,
    spending::CategoryShare,
    tier::Tier,
    transaction::{Transaction, TransactionType},
};
use rust_decimal::Decimal;
use serde::Serialize;
use services::{
    score_service::ScoreService, spending_service::SpendingService, tier_service::TierService,
};
use std::collections::HashMap;
use storage::{
    legacy::{ImportReport, LegacySnapshot},
    traits::SnapshotSource,
};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Budget Tracker core library.
///
/// Holds the current clients and transactions and keeps every client's
/// score in sync: each successful mutation recomputes all scores before
/// returning, so `scores()` is never stale.
#[must_use]
pub struct BudgetTracker {
    clients: Vec<Client>,
    /// Kept sorted by date, oldest first.
    transactions: Vec<Transaction>,
    scores: Vec<ScoreRecord>,
    score_service: ScoreService,
    spending_service: SpendingService,
    tier_service: TierService,
    /// Tracks whether any mutation has occurred since the last load/export.
    dirty: bool,
}

impl std::fmt::Debug for BudgetTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetTracker")
            .field("clients", &self.clients.len())
            .field("transactions", &self.transactions.len())
            .field("config", self.score_service.config())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Default for BudgetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetTracker {
    /// Create an empty tracker with the default scoring rules.
    pub fn new() -> Self {
        Self::build(ScoringConfig::default())
    }

    /// Create an empty tracker with custom scoring rules.
    pub fn with_config(config: ScoringConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Load clients and transactions from a snapshot source.
    ///
    /// Rejects blank, duplicate (case-insensitive) or negative-income
    /// clients, duplicate ids and negative transaction values.
    pub fn load_from(source: &dyn SnapshotSource) -> Result<Self, CoreError> {
        Self::load_from_with_config(source, ScoringConfig::default())
    }

    pub fn load_from_with_config(
        source: &dyn SnapshotSource,
        config: ScoringConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let mut tracker = Self::build(config);

        // Same checks as the interactive commands. Transactions may still
        // reference clients the source no longer has; those never score.
        for client in source.load_clients()? {
            tracker.admit_client(client)?;
        }
        for transaction in source.load_transactions()? {
            tracker.check_transaction(&transaction)?;
            binary_insert(&mut tracker.transactions, transaction);
        }

        tracker.recompute();
        Ok(tracker)
    }

    // ── Configuration ───────────────────────────────────────────────

    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        self.score_service.config()
    }

    /// Replace the scoring rules and rescore everything.
    pub fn set_config(&mut self, config: ScoringConfig) -> Result<(), CoreError> {
        config.validate()?;
        self.score_service = ScoreService::with_config(config);
        self.recompute();
        Ok(())
    }

    // ── Client Management ───────────────────────────────────────────

    /// Register a new client. Returns its id.
    pub fn add_client(
        &mut self,
        name: impl Into<String>,
        monthly_income: Decimal,
    ) -> Result<Uuid, CoreError> {
        validate_income(monthly_income)?;
        self.insert_client(Client::new(name, monthly_income))
    }

    /// Register a fully built client (birthdate, color, ...).
    pub fn insert_client(&mut self, client: Client) -> Result<Uuid, CoreError> {
        let id = self.admit_client(client)?;
        self.touch();
        Ok(id)
    }

    /// Change a client's name and monthly income. The daily goal follows.
    pub fn update_client(
        &mut self,
        client_id: Uuid,
        name: impl Into<String>,
        monthly_income: Decimal,
    ) -> Result<(), CoreError> {
        let name = validate_name(&name.into())?;
        validate_income(monthly_income)?;
        self.ensure_name_free(&name, Some(client_id))?;

        let client = self
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or_else(|| CoreError::ClientNotFound(client_id.to_string()))?;
        client.name = name;
        client.monthly_income = monthly_income;
        self.touch();
        Ok(())
    }

    /// Delete a client. Its transactions are kept but become unassigned.
    pub fn remove_client(&mut self, client_id: Uuid) -> Result<Client, CoreError> {
        let idx = self
            .clients
            .iter()
            .position(|c| c.id == client_id)
            .ok_or_else(|| CoreError::ClientNotFound(client_id.to_string()))?;
        let removed = self.clients.remove(idx);

        for tx in self
            .transactions
            .iter_mut()
            .filter(|t| t.client_id == Some(client_id))
        {
            tx.client_id = None;
        }

        self.touch();
        Ok(removed)
    }

    #[must_use]
    pub fn get_client(&self, client_id: Uuid) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == client_id)
    }

    /// Clients in registration order.
    #[must_use]
    pub fn get_clients(&self) -> &[Client] {
        &self.clients
    }

    /// Case-insensitive lookup by display name.
    #[must_use]
    pub fn find_client_by_name(&self, name: &str) -> Option<&Client> {
        let name = name.trim();
        self.clients.iter().find(|c| c.is_named(name))
    }

    /// Daily goal of a client under the current rules.
    #[must_use]
    pub fn daily_goal(&self, client_id: Uuid) -> Option<Decimal> {
        self.get_client(client_id)
            .map(|c| self.score_service.daily_goal(c))
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record a transaction. A blank category becomes "Outros".
    pub fn record_transaction(
        &mut self,
        kind: TransactionType,
        value: Decimal,
        category: impl Into<String>,
        date: DateTime<FixedOffset>,
        client_id: Option<Uuid>,
    ) -> Result<Uuid, CoreError> {
        let mut tx = Transaction::new(kind, value, category, date);
        tx.client_id = client_id;
        self.insert_transaction(tx)
    }

    /// Record a fully built transaction.
    pub fn insert_transaction(&mut self, transaction: Transaction) -> Result<Uuid, CoreError> {
        self.check_transaction(&transaction)?;
        if let Some(client_id) = transaction.client_id {
            if self.get_client(client_id).is_none() {
                return Err(CoreError::ClientNotFound(client_id.to_string()));
            }
        }

        let id = transaction.id;
        binary_insert(&mut self.transactions, transaction);
        self.touch();
        Ok(id)
    }

    /// Remove a transaction by id, returning it.
    pub fn remove_transaction(&mut self, transaction_id: Uuid) -> Result<Transaction, CoreError> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;
        let removed = self.transactions.remove(idx);
        self.touch();
        Ok(removed)
    }

    #[must_use]
    pub fn get_transaction(&self, transaction_id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == transaction_id)
    }

    /// All transactions, newest first.
    #[must_use]
    pub fn get_transactions(&self) -> Vec<&Transaction> {
        self.transactions.iter().rev().collect()
    }

    /// Transactions of one client, newest first.
    #[must_use]
    pub fn get_transactions_for_client(&self, client_id: Uuid) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .rev()
            .filter(|t| t.client_id == Some(client_id))
            .collect()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    // ── Scores ──────────────────────────────────────────────────────

    /// One score per client, in client order.
    #[must_use]
    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    #[must_use]
    pub fn score_for(&self, client_id: Uuid) -> Option<&ScoreRecord> {
        self.scores.iter().find(|s| s.client_id == client_id)
    }

    /// The tier table, lowest tier first.
    #[must_use]
    pub fn tier_table(&self) -> &'static [Tier] {
        self.tier_service.tiers()
    }

    // ── Spending ────────────────────────────────────────────────────

    #[must_use]
    pub fn category_breakdown(&self) -> Vec<CategoryShare> {
        self.spending_service.category_breakdown(&self.transactions)
    }

    #[must_use]
    pub fn category_breakdown_for(&self, client_id: Uuid) -> Vec<CategoryShare> {
        self.spending_service
            .category_breakdown_for(&self.transactions, client_id)
    }

    /// Sum of all transactions of one kind.
    #[must_use]
    pub fn total_of(&self, kind: TransactionType) -> Decimal {
        self.spending_service.total_of(&self.transactions, kind)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Snapshot of clients, transactions and scores as pretty JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        #[derive(Serialize)]
        struct View<'a> {
            clients: &'a [Client],
            transactions: &'a [Transaction],
            scores: &'a [ScoreRecord],
        }

        serde_json::to_string_pretty(&View {
            clients: &self.clients,
            transactions: &self.transactions,
            scores: &self.scores,
        })
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize tracker: {e}")))
    }

    /// Export all transactions as a JSON array, oldest first.
    pub fn export_transactions_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.transactions).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize transactions: {e}"))
        })
    }

    /// Merge a legacy JSON export into this tracker.
    ///
    /// Imported clients whose name already exists are merged into the
    /// existing client. Undecodable records are skipped and reported.
    pub fn import_legacy_json(&mut self, json: &str) -> Result<ImportReport, CoreError> {
        let (clients, transactions, report) = LegacySnapshot::from_json(json)?.into_parts();

        let mut merged_clients = self.clients.clone();
        let mut remap: HashMap<Uuid, Uuid> = HashMap::new();

        for client in clients {
            let existing = merged_clients
                .iter()
                .find(|c| c.is_named(&client.name) || c.id == client.id)
                .map(|c| c.id);
            match existing {
                Some(id) => {
                    remap.insert(client.id, id);
                }
                None => merged_clients.push(client),
            }
        }

        let mut merged_transactions = self.transactions.clone();
        for mut tx in transactions {
            if let Some(id) = tx.client_id.and_then(|id| remap.get(&id)) {
                tx.client_id = Some(*id);
            }
            if merged_transactions.iter().any(|t| t.id == tx.id) {
                tx.id = Uuid::new_v4();
            }
            binary_insert(&mut merged_transactions, tx);
        }

        self.clients = merged_clients;
        self.transactions = merged_transactions;
        self.touch();
        Ok(report)
    }

    /// Returns `true` if anything changed since the tracker was created or loaded.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Clear the unsaved-changes flag after the caller has persisted the data.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(config: ScoringConfig) -> Self {
        Self {
            clients: Vec::new(),
            transactions: Vec::new(),
            scores: Vec::new(),
            score_service: ScoreService::with_config(config),
            spending_service: SpendingService::new(),
            tier_service: TierService::new(),
            dirty: false,
        }
    }

    /// Mark dirty and rescore after a successful mutation.
    fn touch(&mut self) {
        self.dirty = true;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.scores = self
            .score_service
            .compute_all_scores(&self.clients, &self.transactions);
        debug!(
            "Rescored {} clients over {} transactions",
            self.clients.len(),
            self.transactions.len()
        );
    }

    /// Validate and append a client without rescoring.
    fn admit_client(&mut self, client: Client) -> Result<Uuid, CoreError> {
        let name = validate_name(&client.name)?;
        validate_income(client.monthly_income)?;
        if self.clients.iter().any(|c| c.id == client.id) {
            return Err(CoreError::ValidationError(format!(
                "Client id {} is already in use",
                client.id
            )));
        }
        self.ensure_name_free(&name, None)?;

        let id = client.id;
        self.clients.push(Client { name, ..client });
        Ok(id)
    }

    /// Value and id checks shared by recording and loading.
    fn check_transaction(&self, transaction: &Transaction) -> Result<(), CoreError> {
        if transaction.value < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Transaction value must not be negative (got {})",
                transaction.value
            )));
        }
        if self.transactions.iter().any(|t| t.id == transaction.id) {
            return Err(CoreError::ValidationError(format!(
                "Transaction id {} is already in use",
                transaction.id
            )));
        }
        Ok(())
    }

    fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> Result<(), CoreError> {
        let taken = self
            .clients
            .iter()
            .any(|c| Some(c.id) != except && c.is_named(name));
        if taken {
            return Err(CoreError::DuplicateClient(name.to_string()));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(
            "Client name must not be empty".into(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_income(monthly_income: Decimal) -> Result<(), CoreError> {
    if monthly_income < Decimal::ZERO {
        return Err(CoreError::ValidationError(format!(
            "Monthly income must not be negative (got {monthly_income})"
        )));
    }
    Ok(())
}

/// Insert keeping the vector sorted by date; equal dates keep arrival order.
fn binary_insert(transactions: &mut Vec<Transaction>, transaction: Transaction) {
    let pos = transactions.partition_point(|t| t.date <= transaction.date);
    transactions.insert(pos, transaction);
}
