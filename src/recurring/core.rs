//! Defines the recurring transaction model, its schedule and its database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{
    Error,
    account::AccountId,
    calendar::add_months,
    category::CategoryId,
    database_id::DatabaseId,
    db::row_exists,
    transaction::TransactionType,
};

/// Database identifier for a recurring transaction.
pub type RecurringId = DatabaseId;

/// Implements the string conversions shared by the enums stored as text.
macro_rules! text_enum {
    ($name:ident, $kind:literal, [$($variant:ident => $value:literal, $label:literal),+ $(,)?]) => {
        impl $name {
            /// Every variant in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The value stored in the database and sent in forms.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// The human readable name.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == s)
                    .ok_or_else(|| format!("unknown {} \"{s}\"", $kind))
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error: String| FromSqlError::Other(error.into()))
            }
        }
    };
}

/// Whether a recurring transaction earns or spends money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringType {
    Income,
    /// Recurring expenses are shown as subscriptions.
    Expense,
}

text_enum!(RecurringType, "recurring type", [
    Expense => "expense", "Expense",
    Income => "income", "Income",
]);

impl From<RecurringType> for TransactionType {
    fn from(value: RecurringType) -> Self {
        match value {
            RecurringType::Income => TransactionType::Income,
            RecurringType::Expense => TransactionType::Expense,
        }
    }
}

/// How often a recurring transaction happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    Monthly,
    Yearly,
}

text_enum!(Frequency, "frequency", [
    Weekly => "weekly", "Weekly",
    BiWeekly => "bi_weekly", "Every two weeks",
    Monthly => "monthly", "Monthly",
    Yearly => "yearly", "Yearly",
]);

impl Frequency {
    /// The amount per average month of a transaction of `amount` happening at this frequency.
    pub fn monthly_amount(&self, amount: f64) -> f64 {
        match self {
            Frequency::Weekly => amount * 52.0 / 12.0,
            Frequency::BiWeekly => amount * 26.0 / 12.0,
            Frequency::Monthly => amount,
            Frequency::Yearly => amount / 12.0,
        }
    }

    /// The run date after `date`.
    ///
    /// Monthly and yearly schedules land on the day of month of `start_date`,
    /// or on the last day of shorter months.
    pub fn next_date(&self, date: Date, start_date: Date) -> Date {
        match self {
            Frequency::Weekly => date + Duration::days(7),
            Frequency::BiWeekly => date + Duration::days(14),
            Frequency::Monthly => add_months(date, 1, start_date.day()),
            Frequency::Yearly => add_months(date, 12, start_date.day()),
        }
    }
}

/// Whether a recurring transaction generates transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringStatus {
    Active,
    /// Paused recurring transactions are skipped and keep their next run date.
    Paused,
}

text_enum!(RecurringStatus, "recurring status", [
    Active => "active", "Active",
    Paused => "paused", "Paused",
]);

/// A template that periodically creates a real transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringTransaction {
    pub id: RecurringId,
    pub description: String,
    /// The amount of each generated transaction, always greater than zero.
    pub amount: f64,
    pub recurring_type: RecurringType,
    pub frequency: Frequency,
    /// The first run date, which anchors the day of month for monthly and yearly schedules.
    pub start_date: Date,
    /// The date of the next transaction to generate.
    pub next_run_date: Date,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub status: RecurringStatus,
}

impl RecurringTransaction {
    /// The average cost or income per month.
    pub fn monthly_equivalent(&self) -> f64 {
        self.frequency.monthly_amount(self.amount)
    }

    pub fn is_active(&self) -> bool {
        self.status == RecurringStatus::Active
    }
}

/// The form data for creating or editing a recurring transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringForm {
    pub description: String,
    pub amount: f64,
    pub recurring_type: RecurringType,
    pub frequency: Frequency,
    pub start_date: Date,
    pub account_id: AccountId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl RecurringForm {
    fn validate(&self, connection: &Connection) -> Result<&str, Error> {
        let description = self.description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if !row_exists("account", self.account_id, connection)? {
            return Err(Error::InvalidAccount(self.account_id));
        }

        if let Some(category_id) = self.category_id
            && !row_exists("category", category_id, connection)?
        {
            return Err(Error::InvalidCategory(Some(category_id)));
        }

        Ok(description)
    }
}

const SELECT_COLUMNS: &str = "id, description, amount, recurring_type, frequency, start_date, \
    next_run_date, account_id, category_id, status";

/// Create an active recurring transaction whose first run is on its start date.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyDescription] if the description is blank,
/// - [Error::NonPositiveAmount] if the amount is not greater than zero,
/// - [Error::InvalidAccount] or [Error::InvalidCategory] for unknown references,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_recurring_transaction(
    form: &RecurringForm,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    let description = form.validate(connection)?;

    connection
        .prepare(&format!(
            "INSERT INTO recurring_transaction (description, amount, recurring_type, frequency, \
                start_date, next_run_date, account_id, category_id, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6, ?7, ?8)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                description,
                form.amount,
                form.recurring_type,
                form.frequency,
                form.start_date,
                form.account_id,
                form.category_id,
                RecurringStatus::Active,
            ),
            map_recurring_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a recurring transaction by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a recurring transaction.
pub fn get_recurring_transaction(
    id: RecurringId,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM recurring_transaction WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_recurring_row)
        .map_err(|error| error.into())
}

/// Retrieve every recurring transaction, soonest next run first.
pub fn get_all_recurring_transactions(
    connection: &Connection,
) -> Result<Vec<RecurringTransaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM recurring_transaction
             ORDER BY next_run_date ASC, description ASC"
        ))?
        .query_map([], map_recurring_row)?
        .map(|maybe_recurring| maybe_recurring.map_err(|error| error.into()))
        .collect()
}

/// Update a recurring transaction.
///
/// Moving the start date or changing the frequency restarts the schedule from
/// the new start date. Once transactions have been generated, runs of the new
/// schedule before the pending run of the old schedule are skipped. Otherwise
/// the next run date is kept.
///
/// # Errors
/// Returns [Error::UpdateMissingRecurring] if `id` does not refer to a
/// recurring transaction, or the validation errors of [create_recurring_transaction].
pub fn update_recurring_transaction(
    id: RecurringId,
    form: &RecurringForm,
    connection: &Connection,
) -> Result<(), Error> {
    let description = form.validate(connection)?;

    let current = match get_recurring_transaction(id, connection) {
        Ok(recurring) => recurring,
        Err(Error::NotFound) => return Err(Error::UpdateMissingRecurring),
        Err(error) => return Err(error),
    };

    let next_run_date =
        if current.start_date == form.start_date && current.frequency == form.frequency {
            current.next_run_date
        } else {
            let not_before = get_last_generated_date(id, connection)?
                .map(|_| current.next_run_date);
            first_run_from(form.frequency, form.start_date, not_before)
        };

    let rows_affected = connection.execute(
        "UPDATE recurring_transaction
         SET description = ?1,
             amount = ?2,
             recurring_type = ?3,
             frequency = ?4,
             next_run_date = ?5,
             start_date = ?6,
             account_id = ?7,
             category_id = ?8
         WHERE id = ?9",
        (
            description,
            form.amount,
            form.recurring_type,
            form.frequency,
            next_run_date,
            form.start_date,
            form.account_id,
            form.category_id,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurring);
    }

    Ok(())
}

/// The date of the latest transaction generated by a recurring transaction.
fn get_last_generated_date(
    id: RecurringId,
    connection: &Connection,
) -> Result<Option<Date>, Error> {
    connection
        .query_row(
            "SELECT MAX(date) FROM \"transaction\" WHERE recurring_id = ?1",
            [id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// The first run date of a schedule that is on or after `not_before`.
fn first_run_from(frequency: Frequency, start_date: Date, not_before: Option<Date>) -> Date {
    let mut run_date = start_date;

    if let Some(not_before) = not_before {
        while run_date < not_before {
            run_date = frequency.next_date(run_date, start_date);
        }
    }

    run_date
}

/// Delete a recurring transaction. The transactions it generated are kept.
///
/// # Errors
/// Returns [Error::DeleteMissingRecurring] if `id` does not refer to a recurring transaction.
pub fn delete_recurring_transaction(id: RecurringId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM recurring_transaction WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecurring);
    }

    Ok(())
}

/// Pause an active recurring transaction or resume a paused one, returning the new status.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a recurring transaction.
pub fn toggle_recurring_status(
    id: RecurringId,
    connection: &Connection,
) -> Result<RecurringStatus, Error> {
    connection
        .prepare(
            "UPDATE recurring_transaction
             SET status = CASE status WHEN 'active' THEN 'paused' ELSE 'active' END
             WHERE id = ?1
             RETURNING status",
        )?
        .query_row([id], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Set the next run date of a recurring transaction.
pub(crate) fn set_next_run_date(
    id: RecurringId,
    next_run_date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE recurring_transaction SET next_run_date = ?1 WHERE id = ?2",
        (next_run_date, id),
    )?;

    Ok(())
}

/// Retrieve the active recurring transactions that are due on or before `today`.
pub(crate) fn get_due_recurring_transactions(
    today: Date,
    connection: &Connection,
) -> Result<Vec<RecurringTransaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM recurring_transaction
             WHERE status = 'active' AND next_run_date <= ?1
             ORDER BY next_run_date ASC, id ASC"
        ))?
        .query_map([today], map_recurring_row)?
        .map(|maybe_recurring| maybe_recurring.map_err(|error| error.into()))
        .collect()
}

/// Create the recurring transaction table.
pub fn create_recurring_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring_transaction (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            recurring_type TEXT NOT NULL CHECK (recurring_type IN ('income', 'expense')),
            frequency TEXT NOT NULL,
            start_date TEXT NOT NULL,
            next_run_date TEXT NOT NULL,
            account_id INTEGER NOT NULL,
            category_id INTEGER,
            status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'paused')),
            FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_recurring_next_run
         ON recurring_transaction(status, next_run_date);",
        (),
    )?;

    Ok(())
}

fn map_recurring_row(row: &Row) -> Result<RecurringTransaction, rusqlite::Error> {
    Ok(RecurringTransaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        recurring_type: row.get(3)?,
        frequency: row.get(4)?,
        start_date: row.get(5)?,
        next_run_date: row.get(6)?,
        account_id: row.get(7)?,
        category_id: row.get(8)?,
        status: row.get(9)?,
    })
}
