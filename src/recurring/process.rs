//! Generates the transactions of due recurring transactions.

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    recurring::core::{get_due_recurring_transactions, set_next_run_date},
    transaction::{Transaction, TransactionType, insert_transaction},
};

/// A summary of a run over the due recurring transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    /// The number of recurring transactions that generated at least one transaction.
    pub templates_processed: usize,
    /// The total number of transactions generated.
    pub transactions_created: usize,
}

/// Create a transaction for every missed run of the active recurring
/// transactions that are due on or before `today`.
///
/// A recurring transaction that was last run several periods ago catches up
/// with one transaction per period. Each generated transaction is dated on its
/// run date and moves the account balance like any other transaction.
///
/// All changes are made in a single database transaction, either every due
/// transaction is created or none are.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error, or the
/// validation error of a recurring transaction that can no longer be turned
/// into a transaction.
pub fn process_due_recurring(today: Date, connection: &Connection) -> Result<ProcessResult, Error> {
    let sql_transaction = connection.unchecked_transaction()?;
    let mut result = ProcessResult::default();

    for recurring in get_due_recurring_transactions(today, &sql_transaction)? {
        let transaction_type: TransactionType = recurring.recurring_type.into();
        let mut run_date = recurring.next_run_date;

        while run_date <= today {
            insert_transaction(
                Transaction::build(
                    recurring.amount,
                    run_date,
                    &recurring.description,
                    recurring.account_id,
                )
                .transaction_type(transaction_type)
                .category_id(recurring.category_id)
                .recurring_id(Some(recurring.id)),
                &sql_transaction,
            )
            .inspect_err(|error| {
                tracing::error!(
                    "Could not create transaction for recurring transaction {} on {run_date}: {error}",
                    recurring.id
                )
            })?;

            result.transactions_created += 1;
            run_date = recurring.frequency.next_date(run_date, recurring.start_date);
        }

        set_next_run_date(recurring.id, run_date, &sql_transaction)?;
        result.templates_processed += 1;
    }

    sql_transaction.commit()?;

    if result.transactions_created > 0 {
        tracing::info!(
            "Created {} transactions from {} recurring transactions",
            result.transactions_created,
            result.templates_processed
        );
    }

    Ok(result)
}
