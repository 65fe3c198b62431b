//! Implements a SQLite backed local store.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row};
use time::UtcOffset;

use crate::{
    Error,
    ledger::sort_most_recent_first,
    local_store::LocalStore,
    transaction::{Transaction, TransactionId, TransactionName},
};

/// The version of the local database schema this build reads and writes.
///
/// The version is stored in SQLite's `user_version` pragma.
pub const SCHEMA_VERSION: i64 = 2;

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteLocalStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteLocalStore {
    /// Open (or create) the database file at `path` and bring its schema up
    /// to [SCHEMA_VERSION].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::PersistenceUnavailable] if the file cannot be opened,
    /// - [Error::UnsupportedSchemaVersion] if the file was written by a newer schema,
    /// - or [Error::SqlError] if the upgrade fails.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let connection = Connection::open(path)
            .map_err(|error| Error::PersistenceUnavailable(error.to_string()))?;

        Self::new(connection)
    }

    /// Create a store for `connection`, upgrading its schema if needed.
    ///
    /// # Errors
    /// Returns an error if the schema is newer than [SCHEMA_VERSION] or the
    /// upgrade fails.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl LocalStore for SQLiteLocalStore {
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        let mut transactions = connection
            .prepare("SELECT id, name, amount, timestamp, synced FROM transactions")?
            .query_map([], map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?;

        sort_most_recent_first(&mut transactions);

        Ok(transactions)
    }

    fn upsert(&self, transaction: &Transaction) -> Result<(), Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO transactions (id, name, amount, timestamp, synced)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                amount = excluded.amount,
                timestamp = excluded.timestamp,
                synced = excluded.synced",
            (
                transaction.id,
                transaction.name.as_ref(),
                transaction.amount,
                transaction.timestamp.to_offset(UtcOffset::UTC),
                transaction.synced,
            ),
        )?;

        Ok(())
    }

    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let connection = self.lock()?;

        connection.execute("DELETE FROM transactions WHERE id = ?1", (id,))?;

        Ok(())
    }
}

/// Bring the schema of `connection` up to [SCHEMA_VERSION].
///
/// Version 1 databases predate the transactions table, so every upgrade
/// creates it if it is absent.
fn initialize(connection: &Connection) -> Result<(), Error> {
    let version: i64 = connection.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version > SCHEMA_VERSION {
        tracing::error!(
            "local database has schema version {version}, newer than supported version {SCHEMA_VERSION}"
        );
        return Err(Error::UnsupportedSchemaVersion(version));
    }

    if version < SCHEMA_VERSION {
        tracing::info!("upgrading local database schema from version {version} to {SCHEMA_VERSION}");

        let sql_transaction = connection.unchecked_transaction()?;
        create_transaction_table(&sql_transaction)?;
        sql_transaction.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        sql_transaction.commit()?;
    }

    Ok(())
}

fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                synced INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_synced ON transactions(synced);",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let name: String = row.get(1)?;
    let amount = row.get(2)?;
    let timestamp = row.get(3)?;
    let synced = row.get(4)?;

    Ok(Transaction {
        id,
        name: TransactionName::new_unchecked(&name),
        amount,
        timestamp,
        synced,
    })
}
