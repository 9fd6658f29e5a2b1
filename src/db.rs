//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, account::create_account_table, bank::create_bank_table, budget::create_budget_table,
    category::create_category_table, database_id::DatabaseId,
    recurring::create_recurring_transaction_table, transaction::create_transaction_table,
};

/// Create the tables for the domain models.
///
/// Foreign key enforcement is switched on for `connection` and every table is
/// created in a single transaction. Calling this function on an already
/// initialized database does nothing.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_bank_table(&transaction)?;
    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_recurring_transaction_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Whether `table` has a row with the primary key `id`.
///
/// `table` must be a trusted table name, it is not escaped.
pub fn row_exists(table: &str, id: DatabaseId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
            [id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Whether `error` is a failed UNIQUE constraint.
pub fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        )
    )
}

/// Whether `error` is a failed FOREIGN KEY constraint.
pub fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        )
    )
}
