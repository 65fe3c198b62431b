//! The in-memory list of transactions that drives every view of the widget.
//!
//! The ledger is derived state. The local store and the remote service are the
//! sources of truth, and the ledger is rebuilt from them at start up. After
//! that it is changed only through [Ledger::apply].

use time::OffsetDateTime;

use crate::transaction::{Transaction, TransactionId};

/// A change to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerUpdate {
    /// Insert a newly created transaction at the front of the ledger.
    Append(Transaction),
    /// Replace the contents of the ledger, e.g. after reconciliation.
    ///
    /// The transactions are sorted most recent first.
    Replace(Vec<Transaction>),
    /// Mark a transaction as acknowledged by the remote service.
    MarkSynced(TransactionId),
}

/// The ordered collection of transactions, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `update` to the ledger.
    pub fn apply(&mut self, update: LedgerUpdate) {
        match update {
            LedgerUpdate::Append(transaction) => {
                self.transactions.insert(0, transaction);
            }
            LedgerUpdate::Replace(mut transactions) => {
                sort_most_recent_first(&mut transactions);
                self.transactions = transactions;
            }
            LedgerUpdate::MarkSynced(id) => {
                match self.transactions.iter_mut().find(|t| t.id == id) {
                    Some(transaction) => transaction.synced = true,
                    None => tracing::debug!("tried to mark missing transaction {id} as synced"),
                }
            }
        }
    }

    /// The transactions in the ledger, most recent first.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The sum of all amounts in the ledger.
    pub fn total(&self) -> i64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// The running balance after each transaction, oldest first.
    pub fn cumulative_series(&self) -> Vec<(OffsetDateTime, i64)> {
        let mut balance = 0;

        self.transactions
            .iter()
            .rev()
            .map(|transaction| {
                balance += transaction.amount;
                (transaction.timestamp, balance)
            })
            .collect()
    }
}

/// Sort by timestamp, newest first. Ties keep their relative order.
pub(crate) fn sort_most_recent_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        ledger::{Ledger, LedgerUpdate},
        transaction::{Transaction, TransactionName},
    };

    fn transaction(name: &str, amount: i64, timestamp: OffsetDateTime) -> Transaction {
        Transaction::new(TransactionName::new_unchecked(name), amount, timestamp)
    }

    #[test]
    fn empty_ledger_has_zero_total() {
        let ledger = Ledger::new();

        assert_eq!(ledger.total(), 0);
        assert!(ledger.all().is_empty());
        assert!(ledger.cumulative_series().is_empty());
    }

    #[test]
    fn append_inserts_at_front() {
        let mut ledger = Ledger::new();
        let paycheck = transaction("Paycheck", 500, datetime!(2026-10-01 09:00 UTC));
        let rent = transaction("Rent", -200, datetime!(2026-10-02 09:00 UTC));

        ledger.apply(LedgerUpdate::Append(paycheck.clone()));
        ledger.apply(LedgerUpdate::Append(rent.clone()));

        assert_eq!(ledger.all(), &[rent, paycheck]);
    }

    #[test]
    fn total_is_signed_sum() {
        let mut ledger = Ledger::new();
        let start = datetime!(2026-10-01 09:00 UTC);
        let amounts = [500, -200, 35, -1_000, 0, 7];

        for (i, amount) in amounts.iter().enumerate() {
            ledger.apply(LedgerUpdate::Append(transaction(
                "t",
                *amount,
                start + Duration::minutes(i as i64),
            )));
            let want: i64 = amounts[..=i].iter().sum();
            assert_eq!(ledger.total(), want, "after {} transactions", i + 1);
        }
    }

    #[test]
    fn cumulative_series_is_chronological() {
        let mut ledger = Ledger::new();
        let paycheck_time = datetime!(2026-10-01 09:00 UTC);
        let rent_time = datetime!(2026-10-02 09:00 UTC);
        ledger.apply(LedgerUpdate::Append(transaction("Paycheck", 500, paycheck_time)));
        ledger.apply(LedgerUpdate::Append(transaction("Rent", -200, rent_time)));

        let series = ledger.cumulative_series();

        assert_eq!(series, vec![(paycheck_time, 500), (rent_time, 300)]);
    }

    #[test]
    fn replace_sorts_most_recent_first() {
        let mut ledger = Ledger::new();
        let older = transaction("Older", 1, datetime!(2026-01-01 00:00 UTC));
        let newer = transaction("Newer", 2, datetime!(2026-02-01 00:00 UTC));
        ledger.apply(LedgerUpdate::Append(transaction(
            "Discarded",
            99,
            datetime!(2026-03-01 00:00 UTC),
        )));

        ledger.apply(LedgerUpdate::Replace(vec![older.clone(), newer.clone()]));

        assert_eq!(ledger.all(), &[newer, older]);
        assert_eq!(ledger.total(), 3);
    }

    #[test]
    fn mark_synced_sets_flag() {
        let mut ledger = Ledger::new();
        let paycheck = transaction("Paycheck", 500, datetime!(2026-10-01 09:00 UTC));
        let id = paycheck.id;
        ledger.apply(LedgerUpdate::Append(paycheck));

        ledger.apply(LedgerUpdate::MarkSynced(id));

        assert!(ledger.all()[0].synced);
    }
}
