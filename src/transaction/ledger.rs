//! Keeps the running account balances in step with the transactions.
//!
//! Every change to a transaction row is paired with a call to
//! [apply_balance_effect] or [revert_balance_effect] inside the same SQL
//! transaction.

use rusqlite::Connection;

use crate::{
    Error,
    account::AccountId,
    transaction::{Transaction, TransactionType},
};

/// Add the transaction's effect to the balances of the accounts it touches.
///
/// # Errors
/// Returns [Error::InvalidAccount] if one of the accounts does not exist.
pub(crate) fn apply_balance_effect(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    for (account_id, delta) in balance_deltas(transaction) {
        shift_balance(account_id, delta, connection)?;
    }

    Ok(())
}

/// Undo [apply_balance_effect], e.g. before deleting or editing a transaction.
///
/// # Errors
/// Returns [Error::InvalidAccount] if one of the accounts does not exist.
pub(crate) fn revert_balance_effect(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    for (account_id, delta) in balance_deltas(transaction) {
        shift_balance(account_id, -delta, connection)?;
    }

    Ok(())
}

fn balance_deltas(transaction: &Transaction) -> Vec<(AccountId, f64)> {
    let amount = transaction.amount;

    match (transaction.transaction_type, transaction.related_account_id) {
        (TransactionType::Income, _) => vec![(transaction.account_id, amount)],
        (TransactionType::Expense, _) => vec![(transaction.account_id, -amount)],
        (TransactionType::Transfer, Some(related_account_id)) => vec![
            (transaction.account_id, -amount),
            (related_account_id, amount),
        ],
        (TransactionType::Transfer, None) => {
            tracing::warn!(
                "transfer {} has no destination account, only the source balance changes",
                transaction.id
            );
            vec![(transaction.account_id, -amount)]
        }
    }
}

fn shift_balance(account_id: AccountId, delta: f64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET current_balance = current_balance + ?1 WHERE id = ?2",
        (delta, account_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::InvalidAccount(account_id));
    }

    Ok(())
}
