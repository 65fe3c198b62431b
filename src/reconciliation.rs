//! Brings the ledger up to date with the local store and the remote service at start up.
//!
//! Reconciliation runs in two steps, in order:
//! 1. Every unsynced transaction in the local store is pushed to the remote
//!    service. Acknowledged transactions are marked as synced in the store.
//! 2. The remote service's list of transactions is fetched and merged with the
//!    local store. Unsynced local transactions that the remote service already
//!    holds are marked as synced in the store. The ledger is then replaced
//!    with the merged list.
//!
//! If the remote list cannot be fetched, the ledger is seeded from the local
//! store alone.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use crate::{
    Error,
    ledger::{Ledger, LedgerUpdate, sort_most_recent_first},
    local_store::LocalStore,
    notice::{Notice, NoticeBoard},
    sync_client::RemoteClient,
    transaction::{Transaction, TransactionId},
};

/// What happened during a call to [reconcile].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// The number of unsynced transactions that were pushed.
    pub retried: usize,
    /// The number of pushed transactions the remote service acknowledged.
    pub acknowledged: usize,
    /// The number of pushed transactions the remote service rejected.
    pub rejected: usize,
    /// The number of pushes that did not complete.
    pub failed: usize,
    /// The number of unsynced transactions found in the remote list, e.g.
    /// because the response to an earlier push was lost.
    pub confirmed: usize,
    /// Whether the remote list of transactions could be fetched.
    pub remote_available: bool,
}

/// Retry unsynced transactions, then replace the ledger with the merge of the
/// local store and the remote service.
///
/// Rejected pushes post a notice to `notices`. Failed pushes and an
/// unreachable remote service are logged, the affected transactions stay
/// unsynced in the local store and are retried on the next call.
///
/// # Errors
/// This function will return a:
/// - [Error::LedgerLockError] if the ledger lock is poisoned,
/// - or the store's error if the local transactions could not be read.
pub async fn reconcile(
    local_store: &dyn LocalStore,
    remote_client: &RemoteClient,
    ledger: &Mutex<Ledger>,
    notices: &NoticeBoard,
) -> Result<ReconciliationReport, Error> {
    let mut report = ReconciliationReport::default();

    let local = local_store
        .get_all()
        .inspect_err(|error| tracing::error!("could not read local transactions: {error}"))?;

    let local = retry_unsynced(local, local_store, remote_client, notices, &mut report).await;

    let merged = match remote_client.fetch_all().await {
        Ok(remote) => {
            report.remote_available = true;
            report.confirmed = confirm_remotely_stored(&remote, &local, local_store);
            merge(remote, local)
        }
        Err(error) => {
            tracing::warn!("could not fetch remote transactions, using local store only: {error}");
            local
        }
    };

    ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?
        .apply(LedgerUpdate::Replace(merged));

    tracing::info!("Reconciliation finished: {report:?}");

    Ok(report)
}

/// Push each unsynced transaction once, returning `local` with acknowledged
/// transactions marked as synced.
async fn retry_unsynced(
    local: Vec<Transaction>,
    local_store: &dyn LocalStore,
    remote_client: &RemoteClient,
    notices: &NoticeBoard,
    report: &mut ReconciliationReport,
) -> Vec<Transaction> {
    let mut retried = Vec::with_capacity(local.len());

    for transaction in local {
        if transaction.synced {
            retried.push(transaction);
            continue;
        }

        report.retried += 1;

        match remote_client.push(&transaction).await {
            Ok(_) => {
                report.acknowledged += 1;
                let transaction = transaction.into_synced();

                if let Err(error) = local_store.upsert(&transaction) {
                    tracing::error!(
                        "could not mark transaction {} as synced locally: {error}",
                        transaction.id
                    );
                }

                retried.push(transaction);
            }
            Err(Error::RemoteValidation(details)) => {
                report.rejected += 1;
                tracing::warn!("remote service rejected transaction {}: {details}", transaction.id);
                notices.post(Notice::new(
                    "Missing Information",
                    &format!(
                        "The server rejected \"{}\". It is kept on this device only.",
                        transaction.name
                    ),
                ));
                retried.push(transaction);
            }
            Err(error) => {
                report.failed += 1;
                tracing::warn!(
                    "could not push transaction {}, it will be retried on the next start up: {error}",
                    transaction.id
                );
                retried.push(transaction);
            }
        }
    }

    retried
}

/// Persist the remote copy of every unsynced local transaction the remote
/// service already holds, returning how many were stored.
fn confirm_remotely_stored(
    remote: &[Transaction],
    local: &[Transaction],
    local_store: &dyn LocalStore,
) -> usize {
    let unsynced: HashSet<TransactionId> = local
        .iter()
        .filter(|transaction| !transaction.synced)
        .map(|transaction| transaction.id)
        .collect();

    let mut confirmed = 0;

    for transaction in remote.iter().filter(|transaction| unsynced.contains(&transaction.id)) {
        match local_store.upsert(transaction) {
            Ok(()) => confirmed += 1,
            Err(error) => tracing::error!(
                "could not mark transaction {} as synced locally: {error}",
                transaction.id
            ),
        }
    }

    confirmed
}

/// Merge the remote and local transactions by ID.
///
/// Remote records win for IDs present in both lists. Local records missing
/// from the remote list are kept only if they are unsynced.
fn merge(remote: Vec<Transaction>, local: Vec<Transaction>) -> Vec<Transaction> {
    // Deduplicate remote records in case the service returns an ID twice.
    let mut merged: HashMap<TransactionId, Transaction> = remote
        .into_iter()
        .map(|transaction| (transaction.id, transaction))
        .collect();

    for transaction in local {
        if merged.contains_key(&transaction.id) {
            continue;
        }

        if transaction.synced {
            tracing::debug!(
                "dropping transaction {} that the remote service no longer has",
                transaction.id
            );
            continue;
        }

        merged.insert(transaction.id, transaction);
    }

    let mut merged: Vec<Transaction> = merged.into_values().collect();
    sort_most_recent_first(&mut merged);

    merged
}
