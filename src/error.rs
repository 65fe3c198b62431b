//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::alert::Alert;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used as the name of a transaction.
    #[error("transaction name cannot be empty")]
    EmptyTransactionName,

    /// The amount field of the form was left empty.
    #[error("transaction amount cannot be empty")]
    MissingAmount,

    /// The amount field of the form could not be parsed as a whole number.
    #[error("\"{0}\" is not a valid whole number amount")]
    InvalidAmount(String),

    /// The remote service rejected the transaction, e.g., because a required
    /// field was missing.
    ///
    /// The string holds the `errors` payload returned by the remote service.
    #[error("the remote service rejected the transaction: {0}")]
    RemoteValidation(String),

    /// The remote service could not be reached or gave an unusable response.
    ///
    /// Transactions that fail with this error stay unsynced and are retried
    /// on the next start up.
    #[error("the remote service is unavailable: {0}")]
    RemoteUnavailable(String),

    /// The local database could not be opened.
    #[error("offline storage is not available: {0}")]
    PersistenceUnavailable(String),

    /// The local database was written by a newer version of the application.
    #[error("unsupported local database schema version {0}")]
    UnsupportedSchemaVersion(i64),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the ledger lock
    #[error("could not acquire the ledger lock")]
    LedgerLockError,

    /// Could not acquire the local database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::RemoteUnavailable(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_alert_response()
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyTransactionName | Error::MissingAmount => {
                (StatusCode::UNPROCESSABLE_ENTITY, missing_information_alert())
            }
            Error::RemoteValidation(_) => (StatusCode::BAD_GATEWAY, missing_information_alert()),
            Error::InvalidAmount(amount) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!("\"{amount}\" is not a whole number."),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }

    /// The message to show next to the funds form, if the error should be
    /// reported there rather than as an alert.
    ///
    /// Empty fields and payloads rejected by the remote service are both
    /// reported as "Missing Information".
    pub fn inline_message(&self) -> Option<String> {
        match self {
            Error::EmptyTransactionName | Error::MissingAmount | Error::RemoteValidation(_) => {
                Some(MISSING_INFORMATION.to_owned())
            }
            Error::InvalidAmount(amount) => Some(format!("\"{amount}\" is not a whole number")),
            _ => None,
        }
    }
}

const MISSING_INFORMATION: &str = "Missing Information";

fn missing_information_alert() -> Alert {
    Alert::Error {
        message: MISSING_INFORMATION.to_owned(),
        details: "Enter both a name and an amount.".to_owned(),
    }
}
