//! Defines the route handler for the page that displays the widget.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::html;

use crate::{
    AppState, Error,
    html::{PAGE_CONTAINER_STYLE, base},
    ledger::Ledger,
    notice::NoticeBoard,
    transaction::FundsForm,
    widget::view::render_widget,
};

/// The state needed to display the widget.
#[derive(Debug, Clone)]
pub struct WidgetState {
    /// The in-memory list of transactions shown by the widget.
    pub ledger: Arc<Mutex<Ledger>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// Messages to show the user on the next render.
    pub notices: NoticeBoard,
}

impl FromRef<AppState> for WidgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            local_timezone: state.local_timezone.clone(),
            notices: state.notices.clone(),
        }
    }
}

/// Display the widget.
///
/// HTMX requests get the widget fragment only, other requests get a full page.
pub async fn get_widget_page(
    State(state): State<WidgetState>,
    HxRequest(is_htmx_request): HxRequest,
) -> Result<Response, Error> {
    let widget = render_widget(
        &state.ledger,
        &state.notices,
        &state.local_timezone,
        &FundsForm::default(),
        None,
    )?;

    if is_htmx_request {
        return Ok(widget.into_response());
    }

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="mb-6 text-3xl font-bold" { "Budget Tracker" }

            (widget)
        }
    );

    Ok(base("Widget", &content).into_response())
}
