//! The expense tracking widget: a running total, a form for adding and
//! subtracting funds, a table of transactions and a chart of the balance.
//!
//! The widget is rendered on the server. HTMX swaps the whole widget after
//! every submission, so the total, table and chart are always redrawn from
//! the ledger.

mod chart;
mod funds;
mod page;
mod table;
mod view;

pub use funds::{FundsState, add_funds_endpoint, subtract_funds_endpoint};
pub use page::{WidgetState, get_widget_page};
