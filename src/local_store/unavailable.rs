use crate::{
    Error,
    local_store::LocalStore,
    transaction::{Transaction, TransactionId},
};

/// The store used when the local database cannot be opened.
///
/// Reads return nothing and writes are dropped, so the rest of the
/// application keeps working without offline support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocalStore;

impl LocalStore for UnavailableLocalStore {
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        Ok(Vec::new())
    }

    fn upsert(&self, transaction: &Transaction) -> Result<(), Error> {
        tracing::debug!("offline support unavailable, not storing {}", transaction.id);
        Ok(())
    }

    fn delete(&self, _id: TransactionId) -> Result<(), Error> {
        Ok(())
    }
}
