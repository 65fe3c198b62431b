//! The local durable store for transactions.
//!
//! Every transaction is written here before it is pushed to the remote
//! service, so that records created while offline survive a restart and can
//! be retried. The store is keyed by [TransactionId].

mod sqlite;
mod unavailable;

use std::{path::Path, sync::Arc};

pub use sqlite::{SCHEMA_VERSION, SQLiteLocalStore};
pub use unavailable::UnavailableLocalStore;

use crate::{
    Error, Notice,
    transaction::{Transaction, TransactionId},
};

/// Handles the persistence of transactions on the local machine.
pub trait LocalStore: Send + Sync {
    /// Retrieve every stored transaction, most recent first.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Insert `transaction`, or overwrite the stored record with the same ID.
    fn upsert(&self, transaction: &Transaction) -> Result<(), Error>;

    /// Remove the transaction with `id`. Removing a missing ID is not an error.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;
}

/// Open the SQLite store at `path`.
///
/// If the database cannot be opened or upgraded, the application keeps
/// running without offline support: a no-op store is returned together with a
/// notice that should be shown to the user once.
pub fn open_local_store(path: &Path) -> (Arc<dyn LocalStore>, Option<Notice>) {
    match SQLiteLocalStore::open(path) {
        Ok(store) => {
            tracing::info!("Opened local store at {}", path.display());
            (Arc::new(store), None)
        }
        Err(error) => {
            tracing::warn!(
                "Could not open local store at {}, offline support is disabled: {error}",
                path.display()
            );
            let notice = Notice::new(
                "Offline support is not available",
                "Transactions will only be saved once the server confirms them.",
            );
            (Arc::new(UnavailableLocalStore), Some(notice))
        }
    }
}
