//! Database query helpers for the transactions page.

use rusqlite::{Connection, named_params};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    calendar::month_bounds,
    category::CategoryId,
    transaction::{Transaction, TransactionType, map_transaction_row},
};

/// Narrows down which transactions are listed.
///
/// `None` fields do not filter anything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TransactionFilter {
    /// Transactions that change the balance of this account, including
    /// transfers into it.
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    /// Any day in the month to list.
    pub month: Option<Date>,
}

/// A transaction joined with the names shown in the transactions table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionTableRow {
    pub transaction: Transaction,
    pub account_name: String,
    pub related_account_name: Option<String>,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
}

const FILTER_CLAUSE: &str = "(:account_id IS NULL OR t.account_id = :account_id \
        OR t.related_account_id = :account_id)
    AND (:category_id IS NULL OR t.category_id = :category_id)
    AND (:transaction_type IS NULL OR t.transaction_type = :transaction_type)
    AND (:month_start IS NULL OR t.date BETWEEN :month_start AND :month_end)";

/// Count the transactions that match `filter`.
pub(crate) fn count_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let month = filter.month.map(month_bounds);

    connection
        .prepare(&format!(
            "SELECT COUNT(t.id) FROM \"transaction\" t WHERE {FILTER_CLAUSE}"
        ))?
        .query_row(
            named_params! {
                ":account_id": filter.account_id,
                ":category_id": filter.category_id,
                ":transaction_type": filter.transaction_type,
                ":month_start": month.map(|range| range.start),
                ":month_end": month.map(|range| range.end),
            },
            |row| row.get::<_, i64>(0),
        )
        .map(|count| u64::try_from(count).unwrap_or_default())
        .map_err(|error| error.into())
}

/// Get one page of the transactions that match `filter`, newest first.
///
/// Transactions on the same day are ordered by ID so the order is stable
/// after edits.
pub(crate) fn query_transaction_table_rows(
    filter: &TransactionFilter,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<TransactionTableRow>, Error> {
    let month = filter.month.map(month_bounds);

    connection
        .prepare(&format!(
            "SELECT t.id, t.amount, t.transaction_type, t.description, t.date, t.account_id, \
                t.category_id, t.related_account_id, t.import_id, t.recurring_id, \
                a.name, r.name, c.name, c.icon, c.color
             FROM \"transaction\" t
             INNER JOIN account a ON t.account_id = a.id
             LEFT JOIN account r ON t.related_account_id = r.id
             LEFT JOIN category c ON t.category_id = c.id
             WHERE {FILTER_CLAUSE}
             ORDER BY t.date DESC, t.id DESC
             LIMIT :limit OFFSET :offset"
        ))?
        .query_map(
            named_params! {
                ":account_id": filter.account_id,
                ":category_id": filter.category_id,
                ":transaction_type": filter.transaction_type,
                ":month_start": month.map(|range| range.start),
                ":month_end": month.map(|range| range.end),
                ":limit": i64::try_from(limit).unwrap_or(i64::MAX),
                ":offset": i64::try_from(offset).unwrap_or(i64::MAX),
            },
            |row| {
                Ok(TransactionTableRow {
                    transaction: map_transaction_row(row)?,
                    account_name: row.get(10)?,
                    related_account_name: row.get(11)?,
                    category_name: row.get(12)?,
                    category_icon: row.get(13)?,
                    category_color: row.get(14)?,
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(Error::SqlError))
        .collect()
}
