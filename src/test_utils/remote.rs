//! A stand-in for the remote transaction service, served on an ephemeral port.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::{
    sync_client::{RemoteTransaction, TRANSACTIONS_API},
    transaction::{Transaction, TransactionId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Accept,
    Reject,
    Unavailable,
}

#[derive(Debug, Clone)]
struct FakeRemoteState {
    mode: Mode,
    stored: Arc<Mutex<Vec<Transaction>>>,
    /// Records listed after `stored` exactly as given.
    raw: Arc<Vec<serde_json::Value>>,
    received: Arc<Mutex<Vec<TransactionId>>>,
}

/// A running fake remote service.
pub(crate) struct FakeRemote {
    address: SocketAddr,
    state: FakeRemoteState,
}

impl FakeRemote {
    /// Serve an empty service that accepts every push.
    pub(crate) async fn spawn() -> Self {
        Self::start(Mode::Accept, Vec::new(), Vec::new()).await
    }

    /// Serve a service holding `stored` that accepts every push.
    pub(crate) async fn spawn_with(stored: Vec<Transaction>) -> Self {
        Self::start(Mode::Accept, stored, Vec::new()).await
    }

    /// Serve a service that lists `stored` followed by the JSON records in
    /// `raw`, and accepts every push.
    pub(crate) async fn spawn_with_raw(stored: Vec<Transaction>, raw: Vec<serde_json::Value>) -> Self {
        Self::start(Mode::Accept, stored, raw).await
    }

    /// Serve an empty service that rejects every push with validation errors.
    pub(crate) async fn spawn_rejecting() -> Self {
        Self::start(Mode::Reject, Vec::new(), Vec::new()).await
    }

    /// Serve a service holding `stored` that answers every push with 503
    /// Service Unavailable.
    pub(crate) async fn spawn_unavailable_with(stored: Vec<Transaction>) -> Self {
        Self::start(Mode::Unavailable, stored, Vec::new()).await
    }

    async fn start(mode: Mode, stored: Vec<Transaction>, raw: Vec<serde_json::Value>) -> Self {
        let state = FakeRemoteState {
            mode,
            stored: Arc::new(Mutex::new(stored)),
            raw: Arc::new(raw),
            received: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route(TRANSACTIONS_API, get(list_transactions).post(create_transaction))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind fake remote listener");
        let address = listener.local_addr().expect("Could not get fake remote address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake remote service stopped unexpectedly");
        });

        Self { address, state }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// The IDs of every pushed transaction, in the order they arrived.
    pub(crate) fn received(&self) -> Vec<TransactionId> {
        self.state.received.lock().unwrap().clone()
    }

    /// The transactions the service currently holds.
    pub(crate) fn stored(&self) -> Vec<Transaction> {
        self.state.stored.lock().unwrap().clone()
    }
}

/// A base URL that refuses connections.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind listener");
    let address = listener.local_addr().expect("Could not get address");
    drop(listener);

    format!("http://{address}")
}

async fn list_transactions(State(state): State<FakeRemoteState>) -> Json<Vec<serde_json::Value>> {
    let stored = state.stored.lock().unwrap();
    let records = stored
        .iter()
        .map(|transaction| serde_json::to_value(RemoteTransaction::from(transaction)).unwrap())
        .chain(state.raw.iter().cloned())
        .collect();

    Json(records)
}

async fn create_transaction(
    State(state): State<FakeRemoteState>,
    Json(record): Json<RemoteTransaction>,
) -> Response {
    let transaction = Transaction::from(record.clone());
    state.received.lock().unwrap().push(transaction.id);

    match state.mode {
        Mode::Reject => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "name": "Path `name` is required." } })),
        )
            .into_response(),
        Mode::Unavailable => {
            (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response()
        }
        Mode::Accept => {
            state.stored.lock().unwrap().push(transaction);
            Json(record).into_response()
        }
    }
}
