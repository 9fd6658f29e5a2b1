//! Defines the core data models and database queries for accounts.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    bank::BankId,
    database_id::DatabaseId,
    db::{is_foreign_key_violation, is_unique_violation},
    transaction::{get_transactions_touching_account, revert_balance_effect},
};

/// Database identifier for an account.
pub type AccountId = DatabaseId;

/// What an account is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    Investment,
    CreditCard,
    Wallet,
    Other,
}

impl AccountKind {
    /// Every account kind in display order.
    pub const ALL: [AccountKind; 6] = [
        AccountKind::Checking,
        AccountKind::Savings,
        AccountKind::Investment,
        AccountKind::CreditCard,
        AccountKind::Wallet,
        AccountKind::Other,
    ];

    /// The value stored in the database and sent in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Investment => "investment",
            AccountKind::CreditCard => "credit_card",
            AccountKind::Wallet => "wallet",
            AccountKind::Other => "other",
        }
    }

    /// The human readable name.
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Savings",
            AccountKind::Investment => "Investment",
            AccountKind::CreditCard => "Credit Card",
            AccountKind::Wallet => "Wallet",
            AccountKind::Other => "Other",
        }
    }
}

impl Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown account kind \"{s}\""))
    }
}

impl ToSql for AccountKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An account that holds money, e.g. a checking account, a credit card or a cash wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The unique display name of the account.
    pub name: String,
    pub kind: AccountKind,
    /// The balance before any recorded transactions.
    pub opening_balance: f64,
    /// The running balance, kept up to date as transactions are recorded.
    pub current_balance: f64,
    /// Favorite accounts are listed first.
    pub is_favorite: bool,
    /// The bank that holds the account, if any.
    pub bank_id: Option<BankId>,
}

/// The form data for creating or editing an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountForm {
    pub name: String,
    pub kind: AccountKind,
    /// The balance in dollars before any recorded transactions.
    pub opening_balance: f64,
    pub bank_id: Option<BankId>,
}

impl AccountForm {
    /// An account form without a bank.
    pub fn new(name: &str, kind: AccountKind, opening_balance: f64) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            opening_balance,
            bank_id: None,
        }
    }

    /// Set the bank that holds the account.
    pub fn bank_id(mut self, bank_id: Option<BankId>) -> Self {
        self.bank_id = bank_id;
        self
    }

    fn validated_name(&self) -> Result<&str, Error> {
        let name = self.name.trim();

        if name.is_empty() {
            Err(Error::EmptyAccountName)
        } else {
            Ok(name)
        }
    }
}

/// The outcome of recomputing an account's balance from its transactions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    /// The stored balance before reconciling.
    pub previous_balance: f64,
    /// The balance implied by the opening balance and the account's transactions.
    pub expected_balance: f64,
}

impl Reconciliation {
    /// How far the stored balance had drifted from the expected balance.
    pub fn drift(&self) -> f64 {
        self.previous_balance - self.expected_balance
    }
}

const SELECT_COLUMNS: &str =
    "id, name, kind, opening_balance, current_balance, is_favorite, bank_id";

/// Create an account whose current balance starts at its opening balance.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyAccountName] if the name is blank,
/// - [Error::DuplicateAccountName] if an account with the same name exists,
/// - [Error::InvalidBank] if the bank ID does not refer to a bank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_account(form: &AccountForm, connection: &Connection) -> Result<Account, Error> {
    let name = form.validated_name()?;

    connection
        .prepare(&format!(
            "INSERT INTO account (name, kind, opening_balance, current_balance, bank_id)
             VALUES (?1, ?2, ?3, ?3, ?4)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (name, form.kind, form.opening_balance, form.bank_id),
            map_row_to_account,
        )
        .map_err(|error| map_constraint_error(error, name))
}

/// Retrieve an account by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to an account.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM account WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row_to_account)
        .map_err(|error| error.into())
}

/// Retrieve all accounts, favorites first and then by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM account ORDER BY is_favorite DESC, name ASC"
        ))?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(|error| error.into()))
        .collect()
}

/// Update an account's details.
///
/// Changing the opening balance shifts the current balance by the same amount
/// so that the balances of recorded transactions are kept.
///
/// # Errors
/// Returns [Error::UpdateMissingAccount] if the account does not exist, or
/// the same validation errors as [create_account].
pub fn update_account(
    id: AccountId,
    form: &AccountForm,
    connection: &Connection,
) -> Result<(), Error> {
    let name = form.validated_name()?;

    let rows_affected = connection
        .execute(
            "UPDATE account
             SET name = ?1,
                 kind = ?2,
                 current_balance = current_balance + (?3 - opening_balance),
                 opening_balance = ?3,
                 bank_id = ?4
             WHERE id = ?5",
            (name, form.kind, form.opening_balance, form.bank_id, id),
        )
        .map_err(|error| map_constraint_error(error, name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Delete an account and every transaction that touches it.
///
/// Transfers between the account and other accounts are reverted on the other
/// accounts before the transactions are deleted. Recurring transactions for the
/// account are deleted too. Everything happens in one database transaction.
///
/// # Errors
/// Returns [Error::DeleteMissingAccount] if the account does not exist.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    for transaction in get_transactions_touching_account(id, &sql_transaction)? {
        revert_balance_effect(&transaction, &sql_transaction)?;
    }

    sql_transaction.execute(
        "DELETE FROM \"transaction\" WHERE account_id = ?1 OR related_account_id = ?1",
        [id],
    )?;

    let rows_affected = sql_transaction.execute("DELETE FROM account WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Flip whether an account is a favorite, returning the new value.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist.
pub fn toggle_favorite_account(id: AccountId, connection: &Connection) -> Result<bool, Error> {
    connection
        .prepare("UPDATE account SET is_favorite = NOT is_favorite WHERE id = ?1 RETURNING is_favorite")?
        .query_row([id], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Recompute an account's balance from its opening balance and transactions
/// and overwrite the stored balance with it.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist.
pub fn reconcile_account(id: AccountId, connection: &Connection) -> Result<Reconciliation, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let reconciliation = sql_transaction
        .prepare(
            "SELECT a.current_balance,
                a.opening_balance
                + COALESCE((
                    SELECT SUM(CASE t.transaction_type WHEN 'income' THEN t.amount ELSE -t.amount END)
                    FROM \"transaction\" t WHERE t.account_id = a.id
                ), 0)
                + COALESCE((
                    SELECT SUM(t.amount) FROM \"transaction\" t
                    WHERE t.related_account_id = a.id AND t.transaction_type = 'transfer'
                ), 0)
            FROM account a WHERE a.id = ?1",
        )?
        .query_row([id], |row| {
            Ok(Reconciliation {
                previous_balance: row.get(0)?,
                expected_balance: row.get(1)?,
            })
        })?;

    sql_transaction.execute(
        "UPDATE account SET current_balance = ?1 WHERE id = ?2",
        (reconciliation.expected_balance, id),
    )?;
    sql_transaction.commit()?;

    Ok(reconciliation)
}

/// Get the total balance across all accounts.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails.
pub fn get_total_account_balance(connection: &Connection) -> Result<f64, Error> {
    let mut stmt = connection.prepare("SELECT COALESCE(SUM(current_balance), 0) FROM account")?;

    let total: f64 = stmt.query_row([], |row| row.get(0))?;

    Ok(total)
}

/// Create the account table.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL,
            opening_balance REAL NOT NULL DEFAULT 0,
            current_balance REAL NOT NULL DEFAULT 0,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            bank_id INTEGER,
            FOREIGN KEY(bank_id) REFERENCES bank(id) ON UPDATE CASCADE ON DELETE SET NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_constraint_error(error: rusqlite::Error, name: &str) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateAccountName(name.to_owned())
    } else if is_foreign_key_violation(&error) {
        Error::InvalidBank
    } else {
        error.into()
    }
}

fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        opening_balance: row.get(3)?,
        current_balance: row.get(4)?,
        is_favorite: row.get(5)?,
        bank_id: row.get(6)?,
    })
}

#[cfg(test)]
mod account_kind_tests {
    use crate::account::AccountKind;

    #[test]
    fn parses_every_kind() {
        for kind in AccountKind::ALL {
            assert_eq!(kind.as_str().parse(), Ok(kind));
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!("piggy_bank".parse::<AccountKind>().is_err());
    }
}
