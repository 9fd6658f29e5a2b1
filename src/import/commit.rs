//! Turning the rows of an uploaded file into transactions.

use rusqlite::Connection;
use sha2::{Digest, Sha256};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    category::get_all_categories,
    db::row_exists,
    import::{
        categorize::Categorizer,
        mapping::ImportForm,
        table::parse_csv_table,
    },
    transaction::{Transaction, TransactionType, import_id_exists, insert_transaction},
};

/// The outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// The number of rows that became transactions.
    pub imported: usize,
    /// The number of rows that were imported before.
    pub duplicates: usize,
    /// The number of rows without a valid date or amount, with a zero amount, or dated after today.
    pub skipped: usize,
    /// The number of imported transactions that were given a category.
    pub categorized: usize,
}

/// The import ID of `row` for `account_id`, the first eight bytes of the SHA-256 digest.
pub fn import_id(account_id: AccountId, row: &[String]) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(account_id.to_be_bytes());

    for cell in row {
        hasher.update([0x1f]);
        hasher.update(cell.as_bytes());
    }

    let digest = hasher.finalize();
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&digest[..8]);

    i64::from_be_bytes(bytes)
}

/// Import the rows of `form.csv_data` into `form.account_id` using the column mapping in `form`.
///
/// Negative amounts become expenses and positive amounts become income. Rows
/// that were imported into the account before are counted as duplicates and
/// left out. Every transaction and balance change is committed together.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCSV] if the CSV data cannot be parsed,
/// - [Error::InvalidColumnMapping] if the mapping does not fit the data,
/// - [Error::InvalidAccount] if the account does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn import_rows(
    form: &ImportForm,
    today: Date,
    connection: &Connection,
) -> Result<ImportSummary, Error> {
    let table = parse_csv_table(&form.csv_data)?;
    let amount_columns = form.amount_columns(table.headers.len())?;

    if !row_exists("account", form.account_id, connection)? {
        return Err(Error::InvalidAccount(form.account_id));
    }

    let categorizer = Categorizer::new(&get_all_categories(connection)?);
    let sql_transaction = connection.unchecked_transaction()?;
    let mut summary = ImportSummary::default();

    for row in &table.rows {
        let date = row
            .get(form.date_column)
            .and_then(|cell| form.date_format.parse(cell));
        let amount = amount_columns.signed_amount(row);

        let (date, amount) = match (date, amount) {
            (Some(date), Some(amount)) if amount != 0.0 && date <= today => (date, amount),
            _ => {
                tracing::debug!("Skipping import row {row:?}");
                summary.skipped += 1;
                continue;
            }
        };

        let import_id = import_id(form.account_id, row);

        if import_id_exists(import_id, &sql_transaction)? {
            summary.duplicates += 1;
            continue;
        }

        let description = row
            .get(form.description_column)
            .map(String::as_str)
            .unwrap_or_default();
        let transaction_type = if amount < 0.0 {
            TransactionType::Expense
        } else {
            TransactionType::Income
        };
        let category_id = categorizer.categorize(description);

        insert_transaction(
            Transaction::build(amount.abs(), date, description, form.account_id)
                .transaction_type(transaction_type)
                .category_id(category_id)
                .import_id(Some(import_id)),
            &sql_transaction,
        )?;

        summary.imported += 1;

        if category_id.is_some() {
            summary.categorized += 1;
        }
    }

    sql_transaction.commit()?;

    Ok(summary)
}
