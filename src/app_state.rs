//! Implements a struct that holds the state of the widget server.

use std::sync::{Arc, Mutex};

use crate::{
    ledger::Ledger, local_store::LocalStore, notice::NoticeBoard, sync_client::RemoteClient,
};

/// The state of the widget server.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory list of transactions shown by the widget.
    pub ledger: Arc<Mutex<Ledger>>,

    /// The local durable store that keeps transactions across restarts.
    pub local_store: Arc<dyn LocalStore>,

    /// The client for the remote transaction service.
    pub remote_client: RemoteClient,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Messages to show the user on the next render.
    pub notices: NoticeBoard,
}

impl AppState {
    /// Create a new [AppState] with an empty ledger.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    /// Populate the ledger with [crate::reconcile] before serving requests.
    pub fn new(
        local_store: Arc<dyn LocalStore>,
        remote_client: RemoteClient,
        local_timezone: &str,
        notices: NoticeBoard,
    ) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::new())),
            local_store,
            remote_client,
            local_timezone: local_timezone.to_owned(),
            notices,
        }
    }
}
