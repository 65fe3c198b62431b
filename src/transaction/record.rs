//! Records a new transaction in the ledger, the local store and the remote service.

use std::sync::Mutex;

use crate::{
    Error,
    ledger::{Ledger, LedgerUpdate},
    local_store::LocalStore,
    sync_client::RemoteClient,
    transaction::Transaction,
};

/// Record `transaction` everywhere it needs to go.
///
/// The ledger is updated first so the widget reflects the new transaction even
/// if the remote service never answers. The transaction is then written to the
/// local store and pushed. Once the remote service acknowledges it, the
/// transaction is marked as synced in both the store and the ledger.
///
/// Returns the transaction as it was last recorded, i.e. synced if the push
/// succeeded and unsynced otherwise.
///
/// # Errors
/// This function will return a:
/// - [Error::LedgerLockError] if the ledger lock is poisoned,
/// - or [Error::RemoteValidation] if the remote service rejected the
///   transaction. The transaction stays in the ledger and the local store.
///
/// Network failures and local store failures are logged and otherwise ignored.
/// The transaction is left unsynced and is retried on the next start up.
pub async fn record_transaction(
    transaction: Transaction,
    ledger: &Mutex<Ledger>,
    local_store: &dyn LocalStore,
    remote_client: &RemoteClient,
) -> Result<Transaction, Error> {
    apply_update(ledger, LedgerUpdate::Append(transaction.clone()))?;

    if let Err(error) = local_store.upsert(&transaction) {
        tracing::error!("could not save transaction {} locally: {error}", transaction.id);
    }

    match remote_client.push(&transaction).await {
        Ok(ack) => {
            let transaction = transaction.into_synced();

            if let Err(error) = local_store.upsert(&transaction) {
                tracing::error!(
                    "could not mark transaction {} as synced locally: {error}",
                    transaction.id
                );
            }

            apply_update(ledger, LedgerUpdate::MarkSynced(ack.id))?;

            Ok(transaction)
        }
        Err(Error::RemoteUnavailable(reason)) => {
            tracing::warn!(
                "could not push transaction {}, it will be retried on the next start up: {reason}",
                transaction.id
            );

            Ok(transaction)
        }
        Err(error) => Err(error),
    }
}

fn apply_update(ledger: &Mutex<Ledger>, update: LedgerUpdate) -> Result<(), Error> {
    let mut ledger = ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    ledger.apply(update);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        Error,
        ledger::Ledger,
        local_store::{LocalStore, SQLiteLocalStore},
        sync_client::RemoteClient,
        test_utils::{FakeRemote, unreachable_url},
        transaction::{Transaction, TransactionName, record::record_transaction},
    };

    fn get_test_store() -> SQLiteLocalStore {
        SQLiteLocalStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn client(base_url: &str) -> RemoteClient {
        RemoteClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn transaction(name: &str, amount: i64) -> Transaction {
        Transaction::new(
            TransactionName::new_unchecked(name),
            amount,
            OffsetDateTime::now_utc(),
        )
    }

    #[tokio::test]
    async fn acknowledged_transaction_is_synced_everywhere() {
        let remote = FakeRemote::spawn().await;
        let store = get_test_store();
        let ledger = Mutex::new(Ledger::new());
        let paycheck = transaction("Paycheck", 500);

        let recorded = record_transaction(paycheck.clone(), &ledger, &store, &client(&remote.base_url()))
            .await
            .unwrap();

        assert!(recorded.synced);
        assert_eq!(store.get_all().unwrap(), vec![paycheck.clone().into_synced()]);
        assert_eq!(ledger.lock().unwrap().all(), &[paycheck.clone().into_synced()]);
        assert_eq!(remote.received(), vec![paycheck.id]);
    }

    #[tokio::test]
    async fn unreachable_remote_leaves_transaction_unsynced() {
        let url = unreachable_url().await;
        let store = get_test_store();
        let ledger = Mutex::new(Ledger::new());
        let paycheck = transaction("Paycheck", 500);

        let recorded = record_transaction(paycheck.clone(), &ledger, &store, &client(&url))
            .await
            .unwrap();

        assert!(!recorded.synced);
        assert_eq!(store.get_all().unwrap(), vec![paycheck.clone()]);
        assert_eq!(ledger.lock().unwrap().total(), 500);
    }

    #[tokio::test]
    async fn rejected_transaction_is_kept_unsynced() {
        let remote = FakeRemote::spawn_rejecting().await;
        let store = get_test_store();
        let ledger = Mutex::new(Ledger::new());
        let rent = transaction("Rent", -200);

        let result = record_transaction(rent.clone(), &ledger, &store, &client(&remote.base_url())).await;

        assert!(
            matches!(result, Err(Error::RemoteValidation(_))),
            "want validation error, got {result:?}"
        );
        assert_eq!(store.get_all().unwrap(), vec![rent.clone()]);
        assert_eq!(ledger.lock().unwrap().all(), &[rent]);
    }

    #[tokio::test]
    async fn total_is_sum_after_several_records() {
        let remote = FakeRemote::spawn().await;
        let store = get_test_store();
        let ledger = Mutex::new(Ledger::new());
        let client = client(&remote.base_url());
        let amounts = [500, -200, 45, -1000, 3];

        for amount in amounts {
            record_transaction(transaction("Item", amount), &ledger, &store, &client)
                .await
                .unwrap();
        }

        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.total(), amounts.iter().sum::<i64>());
        assert_eq!(
            ledger.total(),
            ledger.all().iter().map(|transaction| transaction.amount).sum::<i64>()
        );
    }
}
