//! Database queries for retrieving dashboard transaction data.
//!
//! This module provides a simplified transaction view for dashboard
//! aggregations, containing only the fields needed for totals and charts.

use rusqlite::Connection;
use time::Date;

use crate::{Error, calendar::DateRange, transaction::TransactionType};

/// The label for expenses without a category.
pub(super) const UNCATEGORIZED_LABEL: &str = "Other";

/// A simplified transaction view for dashboard aggregations.
///
/// Only income and expenses are loaded, transfers move money between accounts
/// and are neither.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardTransaction {
    /// The positive amount of the transaction.
    pub amount: f64,
    pub date: Date,
    pub transaction_type: TransactionType,
    /// The category name, `None` for uncategorized transactions.
    pub category: Option<String>,
}

impl DashboardTransaction {
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// Gets the income and expense transactions between the dates of `date_range`, oldest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn get_transactions_in_date_range(
    date_range: DateRange,
    connection: &Connection,
) -> Result<Vec<DashboardTransaction>, Error> {
    connection
        .prepare(
            "SELECT
                t.amount,
                t.date,
                t.transaction_type,
                category.name
            FROM \"transaction\" t
            LEFT JOIN category ON category.id = t.category_id
            WHERE t.transaction_type != 'transfer' AND t.date BETWEEN ?1 AND ?2
            ORDER BY t.date ASC, t.id ASC",
        )?
        .query_map((date_range.start, date_range.end), |row| {
            Ok(DashboardTransaction {
                amount: row.get(0)?,
                date: row.get(1)?,
                transaction_type: row.get(2)?,
                category: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Gets the date of the oldest transaction, if there are any.
pub(super) fn get_first_transaction_date(connection: &Connection) -> Result<Option<Date>, Error> {
    connection
        .query_row("SELECT MIN(date) FROM \"transaction\"", [], |row| row.get(0))
        .map_err(|error| error.into())
}
