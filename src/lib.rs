//! Budget Tracker is an offline-first expense tracking widget.
//!
//! The library serves a small HTML widget for recording deposits and
//! withdrawals. Transactions are written to a local SQLite store first and
//! then pushed to a remote service. Records the remote service has not yet
//! acknowledged are retried every time the application starts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod endpoints;
mod error;
mod html;
mod ledger;
mod local_store;
mod logging;
mod not_found;
mod notice;
mod reconciliation;
mod routing;
mod sync_client;
mod timezone;
mod transaction;
mod widget;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use error::Error;
pub use ledger::{Ledger, LedgerUpdate};
pub use local_store::{
    LocalStore, SCHEMA_VERSION, SQLiteLocalStore, UnavailableLocalStore, open_local_store,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use notice::{Notice, NoticeBoard};
pub use reconciliation::{ReconciliationReport, reconcile};
pub use routing::build_router;
pub use sync_client::{Ack, RemoteClient};
pub use timezone::get_local_offset;
pub use transaction::{Transaction, TransactionId, TransactionName, record_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
