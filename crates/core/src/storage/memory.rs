use crate::errors::CoreError;
use crate::models::client::Client;
use crate::models::transaction::Transaction;

use super::traits::SnapshotSource;

/// A snapshot held in memory. Useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    pub clients: Vec<Client>,
    pub transactions: Vec<Transaction>,
}

impl MemorySnapshot {
    pub fn new(clients: Vec<Client>, transactions: Vec<Transaction>) -> Self {
        Self {
            clients,
            transactions,
        }
    }
}

impl SnapshotSource for MemorySnapshot {
    fn load_transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        Ok(self.transactions.clone())
    }

    fn load_clients(&self) -> Result<Vec<Client>, CoreError> {
        Ok(self.clients.clone())
    }
}
