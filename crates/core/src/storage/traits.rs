use crate::errors::CoreError;
use crate::models::client::Client;
use crate::models::transaction::Transaction;

/// Read side of whatever persists clients and transactions.
///
/// Implementations must finish all I/O before returning; a scoring pass
/// only ever sees the complete snapshot.
pub trait SnapshotSource {
    /// All recorded transactions (may be empty).
    fn load_transactions(&self) -> Result<Vec<Transaction>, CoreError>;

    /// All client profiles (may be empty).
    fn load_clients(&self) -> Result<Vec<Client>, CoreError>;
}
