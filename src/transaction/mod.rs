//! Transactions and the flow for recording them.
//!
//! This module contains:
//! - The `Transaction` model and its validated fields
//! - The form submitted by the widget's "Add Funds" and "Subtract Funds" buttons
//! - The flow that writes a new transaction to the ledger, the local store and
//!   the remote service

mod core;
mod form;
mod record;

pub use core::{FundsDirection, Transaction, TransactionId, TransactionName};
pub use form::FundsForm;
pub use record::record_transaction;
