//! Defines the core data model for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The unique identifier of a transaction.
///
/// Identifiers are random 128-bit values generated when the transaction is
/// created, so records created on different devices or in different sessions
/// never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new random transaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl ToSql for TransactionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TransactionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A validated, non-empty transaction name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct TransactionName(String);

impl TransactionName {
    /// Create a transaction name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTransactionName] if `name`
    /// is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyTransactionName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a transaction name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for TransactionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deposit or withdrawal recorded by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short label, e.g. "Paycheck" or "Rent".
    pub name: TransactionName,
    /// The amount of money in whole dollars.
    ///
    /// Positive values are deposits, negative values are withdrawals.
    pub amount: i64,
    /// When the transaction was created.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Whether the remote service has acknowledged the transaction.
    pub synced: bool,
}

impl Transaction {
    /// Create a new, unsynced transaction with a fresh ID.
    pub fn new(name: TransactionName, amount: i64, timestamp: OffsetDateTime) -> Self {
        Self {
            id: TransactionId::new(),
            name,
            amount,
            timestamp,
            synced: false,
        }
    }

    /// Return a copy of this transaction marked as acknowledged by the remote service.
    pub fn into_synced(self) -> Self {
        Self {
            synced: true,
            ..self
        }
    }
}

/// Which of the widget's buttons created a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundsDirection {
    /// "Add Funds": the amount is stored as entered.
    Add,
    /// "Subtract Funds": the amount is stored negated.
    Subtract,
}

impl FundsDirection {
    /// Apply the direction to the magnitude the user entered.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if the negated magnitude does not fit
    /// in an `i64`.
    pub fn signed_amount(self, magnitude: i64) -> Result<i64, Error> {
        match self {
            FundsDirection::Add => Ok(magnitude),
            FundsDirection::Subtract => magnitude
                .checked_neg()
                .ok_or_else(|| Error::InvalidAmount(magnitude.to_string())),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
