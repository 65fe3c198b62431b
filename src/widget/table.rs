use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
    transaction::Transaction,
};

/// A two column table of transactions in the order given.
///
/// Unsynced transactions are marked so the user can see what has not reached
/// the server yet.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html!(
        div class="relative overflow-x-auto rounded"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Transaction" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    }
                }

                tbody id="transactions"
                {
                    @for transaction in transactions {
                        tr
                            class=(TABLE_ROW_STYLE)
                            data-synced=(transaction.synced)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                (transaction.name)

                                @if !transaction.synced {
                                    span
                                        class="ms-2 text-xs text-gray-400"
                                        title="Not yet saved on the server"
                                    {
                                        "(pending)"
                                    }
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.amount) }
                        }
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="2" class=(TABLE_CELL_STYLE) { "No transactions yet." }
                        }
                    }
                }
            }
        }
    )
}
