//! Defines the endpoints for the "Add Funds" and "Subtract Funds" buttons.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    ledger::Ledger,
    local_store::LocalStore,
    notice::NoticeBoard,
    sync_client::RemoteClient,
    transaction::{FundsDirection, FundsForm, Transaction, record_transaction},
    widget::view::render_widget,
};

/// The state needed to record transactions from the widget.
#[derive(Clone)]
pub struct FundsState {
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

impl FromRef<AppState> for FundsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            local_store: state.local_store.clone(),
            remote_client: state.remote_client.clone(),
            local_timezone: state.local_timezone.clone(),
            notices: state.notices.clone(),
        }
    }
}

/// A route handler for recording a deposit, responds with the updated widget.
pub async fn add_funds_endpoint(
    State(state): State<FundsState>,
    Form(form): Form<FundsForm>,
) -> Response {
    record_funds(state, form, FundsDirection::Add).await
}

/// A route handler for recording a withdrawal, responds with the updated widget.
pub async fn subtract_funds_endpoint(
    State(state): State<FundsState>,
    Form(form): Form<FundsForm>,
) -> Response {
    record_funds(state, form, FundsDirection::Subtract).await
}

async fn record_funds(state: FundsState, form: FundsForm, direction: FundsDirection) -> Response {
    let (name, amount) = match form.parse(direction) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::debug!("rejected funds form {form:?}: {error}");
            return render_with_error(&state, &form, error);
        }
    };

    let transaction = Transaction::new(name, amount, OffsetDateTime::now_utc());

    match record_transaction(
        transaction,
        &state.ledger,
        state.local_store.as_ref(),
        &state.remote_client,
    )
    .await
    {
        // Clear the form once the transaction is recorded.
        Ok(_) => render(&state, &FundsForm::default(), None),
        Err(error) => render_with_error(&state, &FundsForm::default(), error),
    }
}

fn render_with_error(state: &FundsState, form: &FundsForm, error: Error) -> Response {
    match error.inline_message() {
        Some(message) => render(state, form, Some(&message)),
        None => error.into_alert_response(),
    }
}

fn render(state: &FundsState, form: &FundsForm, error: Option<&str>) -> Response {
    match render_widget(
        &state.ledger,
        &state.notices,
        &state.local_timezone,
        form,
        error,
    ) {
        Ok(widget) => widget.into_response(),
        Err(error) => error.into_alert_response(),
    }
}
