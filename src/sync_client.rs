//! The client for the remote transaction service.
//!
//! The remote service is the authoritative copy of every transaction. It
//! exposes two routes under [TRANSACTIONS_API]:
//! - `GET` returns a JSON array of every transaction,
//! - `POST` stores one transaction and responds with either the stored record
//!   or a JSON object with an `errors` member if the payload was rejected.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{Transaction, TransactionId, TransactionName},
};

/// The path of the transaction collection on the remote service.
pub const TRANSACTIONS_API: &str = "/api/transaction";

/// Confirmation that the remote service stored a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// The ID of the acknowledged transaction.
    pub id: TransactionId,
}

/// Pushes transactions to, and fetches transactions from, the remote service.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    transactions_url: String,
}

impl RemoteClient {
    /// Create a client for the service at `base_url`, e.g. `https://example.com`.
    ///
    /// Every request fails with [Error::RemoteUnavailable] if it takes longer
    /// than `timeout`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let transactions_url = format!("{}{}", base_url.trim_end_matches('/'), TRANSACTIONS_API);

        Ok(Self {
            http,
            transactions_url,
        })
    }

    /// Send `transaction` to the remote service.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::RemoteValidation] if the service rejected the payload,
    /// - or [Error::RemoteUnavailable] if the request did not complete or the
    ///   response could not be understood.
    pub async fn push(&self, transaction: &Transaction) -> Result<Ack, Error> {
        let response = self
            .http
            .post(&self.transactions_url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .json(&RemoteTransaction::from(transaction))
            .send()
            .await?;

        let status = response.status();
        let body: PushResponse = response.json().await.map_err(|error| {
            Error::RemoteUnavailable(format!(
                "could not decode response with status {status}: {error}"
            ))
        })?;

        if let Some(errors) = body.errors {
            tracing::warn!("remote service rejected transaction {}: {errors}", transaction.id);
            return Err(Error::RemoteValidation(errors.to_string()));
        }

        if !status.is_success() {
            return Err(Error::RemoteUnavailable(format!(
                "remote service responded with status {status}"
            )));
        }

        tracing::debug!("remote service acknowledged transaction {}", transaction.id);

        Ok(Ack { id: transaction.id })
    }

    /// Fetch every transaction stored by the remote service.
    ///
    /// The returned transactions are marked as synced. Records that cannot be
    /// decoded, e.g. ones with an `_id` that is not a UUID, are logged and
    /// skipped.
    ///
    /// # Errors
    /// Returns [Error::RemoteUnavailable] if the request does not complete,
    /// the service responds with an error status, or the body is not a JSON
    /// array.
    pub async fn fetch_all(&self) -> Result<Vec<Transaction>, Error> {
        let records: Vec<serde_json::Value> = self
            .http
            .get(&self.transactions_url)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(records.into_iter().filter_map(decode_record).collect())
    }
}

/// A transaction as the remote service represents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RemoteTransaction {
    #[serde(rename = "_id")]
    id: TransactionId,
    name: TransactionName,
    #[serde(deserialize_with = "deserialize_value")]
    value: i64,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
}

impl From<&Transaction> for RemoteTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id,
            name: transaction.name.clone(),
            value: transaction.amount,
            date: transaction.timestamp,
        }
    }
}

impl From<RemoteTransaction> for Transaction {
    fn from(record: RemoteTransaction) -> Self {
        Self {
            id: record.id,
            name: record.name,
            amount: record.value,
            timestamp: record.date,
            synced: true,
        }
    }
}

fn decode_record(record: serde_json::Value) -> Option<Transaction> {
    let id = record.get("_id").cloned().unwrap_or_default();

    match serde_json::from_value::<RemoteTransaction>(record) {
        Ok(record) => Some(Transaction::from(record)),
        Err(error) => {
            tracing::warn!("skipping remote transaction with _id {id}: {error}");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

/// The remote service stores `value` as it was posted, so older records may
/// hold the amount as a numeric string.
fn deserialize_value<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Number(i64),
        Text(String),
    }

    match Value::deserialize(deserializer)? {
        Value::Number(number) => Ok(number),
        Value::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        sync_client::{Ack, RemoteClient, RemoteTransaction},
        test_utils::{FakeRemote, unreachable_url},
        transaction::{Transaction, TransactionName},
    };

    fn paycheck() -> Transaction {
        Transaction::new(
            TransactionName::new_unchecked("Paycheck"),
            500,
            datetime!(2026-10-15 09:30 UTC),
        )
    }

    fn client(base_url: &str) -> RemoteClient {
        RemoteClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn serializes_wire_field_names() {
        let transaction = paycheck();

        let value = serde_json::to_value(RemoteTransaction::from(&transaction)).unwrap();

        assert_eq!(
            value,
            json!({
                "_id": transaction.id.to_string(),
                "name": "Paycheck",
                "value": 500,
                "date": "2026-10-15T09:30:00Z",
            })
        );
    }

    #[test]
    fn accepts_numeric_string_value() {
        let id = paycheck().id;
        let record: RemoteTransaction = serde_json::from_value(json!({
            "_id": id.to_string(),
            "name": "Rent",
            "value": "-200",
            "date": "2026-10-15T10:00:00Z",
        }))
        .unwrap();

        let transaction = Transaction::from(record);

        assert_eq!(transaction.amount, -200);
        assert!(transaction.synced);
    }

    #[tokio::test]
    async fn push_returns_ack() {
        let remote = FakeRemote::spawn().await;
        let transaction = paycheck();

        let ack = client(&remote.base_url()).push(&transaction).await;

        assert_eq!(ack, Ok(Ack { id: transaction.id }));
        assert_eq!(remote.received(), vec![transaction.id]);
    }

    #[tokio::test]
    async fn push_reports_validation_errors() {
        let remote = FakeRemote::spawn_rejecting().await;

        let result = client(&remote.base_url()).push(&paycheck()).await;

        assert!(
            matches!(result, Err(Error::RemoteValidation(_))),
            "want validation error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn push_reports_unreachable_service() {
        let url = unreachable_url().await;

        let result = client(&url).push(&paycheck()).await;

        assert!(
            matches!(result, Err(Error::RemoteUnavailable(_))),
            "want unavailable error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn fetch_all_marks_records_synced() {
        let stored = paycheck().into_synced();
        let remote = FakeRemote::spawn_with(vec![stored.clone()]).await;

        let fetched = client(&remote.base_url()).fetch_all().await;

        assert_eq!(fetched, Ok(vec![stored]));
    }

    #[tokio::test]
    async fn fetch_all_skips_records_it_cannot_decode() {
        let stored = paycheck().into_synced();
        let remote = FakeRemote::spawn_with_raw(
            vec![stored.clone()],
            vec![
                json!({
                    "_id": "5f8d0d55b54764421b7156c9",
                    "name": "Groceries",
                    "value": -80,
                    "date": "2026-10-15T11:00:00Z",
                }),
                json!({ "_id": 7, "name": "Rent" }),
            ],
        )
        .await;

        let fetched = client(&remote.base_url()).fetch_all().await;

        assert_eq!(fetched, Ok(vec![stored]));
    }

    #[tokio::test]
    async fn fetch_all_reports_unreachable_service() {
        let url = unreachable_url().await;

        let result = client(&url).fetch_all().await;

        assert!(
            matches!(result, Err(Error::RemoteUnavailable(_))),
            "want unavailable error, got {result:?}"
        );
    }
}
