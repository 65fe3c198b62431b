//! The form the widget submits when the user adds or subtracts funds.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{FundsDirection, TransactionName},
};

/// The raw form data for the "Add Funds" and "Subtract Funds" buttons.
///
/// Both fields are kept as strings so that empty fields can be reported to
/// the user instead of being rejected by the extractor.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FundsForm {
    /// The label for the transaction.
    #[serde(default)]
    pub name: String,
    /// The magnitude of the transaction in whole dollars.
    #[serde(default)]
    pub amount: String,
}

impl FundsForm {
    /// Validate the form and compute the signed amount for `direction`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTransactionName] if the name is empty,
    /// - [Error::MissingAmount] if the amount is empty,
    /// - or [Error::InvalidAmount] if the amount is not a whole number.
    pub fn parse(&self, direction: FundsDirection) -> Result<(TransactionName, i64), Error> {
        let name = TransactionName::new(&self.name)?;

        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(Error::MissingAmount);
        }

        let magnitude: i64 = amount
            .parse()
            .map_err(|_| Error::InvalidAmount(amount.to_owned()))?;

        Ok((name, direction.signed_amount(magnitude)?))
    }
}
