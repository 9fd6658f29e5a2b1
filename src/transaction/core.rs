//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    category::CategoryId,
    database_id::DatabaseId,
    db::row_exists,
    recurring::RecurringId,
    transaction::ledger::{apply_balance_effect, revert_balance_effect},
};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// Which way money moves in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money earned, added to the account.
    Income,
    /// Money spent, taken from the account.
    Expense,
    /// Money moved from the account to the related account.
    Transfer,
}

impl TransactionType {
    /// Every transaction type in display order.
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Expense,
        TransactionType::Income,
        TransactionType::Transfer,
    ];

    /// The value stored in the database and sent in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
        }
    }

    /// The human readable name.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Transfer => "Transfer",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|transaction_type| transaction_type.as_str() == s)
            .ok_or_else(|| format!("unknown transaction type \"{s}\""))
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An income, expense or transfer between two accounts.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money moved, always greater than zero.
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The account money is earned into, spent from, or transferred from.
    pub account_id: AccountId,
    /// The category of an income or expense. Transfers never have one.
    pub category_id: Option<CategoryId>,
    /// The account a transfer sends money to.
    pub related_account_id: Option<AccountId>,
    /// The ID of the import that this transaction belongs to.
    pub import_id: Option<i64>,
    /// The recurring transaction that generated this transaction.
    pub recurring_id: Option<RecurringId>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability. The transaction
    /// is an expense unless [TransactionBuilder::transaction_type] says otherwise.
    pub fn build(
        amount: f64,
        date: Date,
        description: &str,
        account_id: AccountId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            transaction_type: TransactionType::Expense,
            date,
            description: description.to_owned(),
            account_id,
            category_id: None,
            related_account_id: None,
            import_id: None,
            recurring_id: None,
        }
    }

    /// How this transaction changes the balance of `account_id`.
    ///
    /// Returns zero for accounts the transaction does not touch.
    pub fn effect_on(&self, account_id: AccountId) -> f64 {
        let mut effect = 0.0;

        if self.account_id == account_id {
            effect += match self.transaction_type {
                TransactionType::Income => self.amount,
                TransactionType::Expense | TransactionType::Transfer => -self.amount,
            };
        }

        if self.transaction_type == TransactionType::Transfer
            && self.related_account_id == Some(account_id)
        {
            effect += self.amount;
        }

        effect
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::{Transaction, TransactionType};
///
/// let transfer = Transaction::build(250.0, date!(2025-01-15), "Savings", 1)
///     .transaction_type(TransactionType::Transfer)
///     .related_account_id(Some(2));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money moved, must be greater than zero.
    ///
    /// The direction comes from `transaction_type`, not the sign.
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// The date when the transaction occurred.
    pub date: Date,
    pub description: String,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub related_account_id: Option<AccountId>,
    /// Optional unique identifier for imported transactions.
    ///
    /// The database enforces uniqueness on this field so that importing the
    /// same file twice does not duplicate transactions.
    pub import_id: Option<i64>,
    pub recurring_id: Option<RecurringId>,
}

impl TransactionBuilder {
    /// Set whether the transaction is an income, expense or transfer.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the account a transfer sends money to.
    pub fn related_account_id(mut self, related_account_id: Option<AccountId>) -> Self {
        self.related_account_id = related_account_id;
        self
    }

    /// Set the import ID for the transaction.
    pub fn import_id(mut self, import_id: Option<i64>) -> Self {
        self.import_id = import_id;
        self
    }

    /// Set the recurring transaction that generated this transaction.
    pub fn recurring_id(mut self, recurring_id: Option<RecurringId>) -> Self {
        self.recurring_id = recurring_id;
        self
    }

    /// Check the amount and the transfer rules.
    ///
    /// The related account is dropped from incomes and expenses since only
    /// transfers move money into a second account.
    fn validate(mut self) -> Result<Self, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        self.description = self.description.trim().to_owned();

        match self.transaction_type {
            TransactionType::Transfer => {
                let Some(related_account_id) = self.related_account_id else {
                    return Err(Error::TransferMissingDestination);
                };

                if related_account_id == self.account_id {
                    return Err(Error::TransferToSameAccount);
                }

                if self.category_id.is_some() {
                    return Err(Error::TransferWithCategory);
                }
            }
            TransactionType::Income | TransactionType::Expense => {
                self.related_account_id = None;
            }
        }

        Ok(self)
    }
}

const SELECT_COLUMNS: &str = "id, amount, transaction_type, description, date, account_id, \
    category_id, related_account_id, import_id, recurring_id";

/// Create a transaction and apply its effect to the account balances.
///
/// The row and the balance changes are committed together.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is not greater than zero,
/// - [Error::TransferMissingDestination], [Error::TransferToSameAccount] or
///   [Error::TransferWithCategory] if a transfer is malformed,
/// - [Error::InvalidAccount] if either account does not exist,
/// - [Error::InvalidCategory] if the category does not exist,
/// - [Error::DuplicateImportId] if a transaction with the same import ID exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;
    let transaction = insert_transaction(builder, &sql_transaction)?;
    sql_transaction.commit()?;

    Ok(transaction)
}

/// Insert a transaction and apply its balance effect without committing.
///
/// The caller owns the surrounding SQL transaction, which lets imports and
/// recurring transactions commit many rows at once.
///
/// # Errors
/// Returns the same errors as [create_transaction].
pub(crate) fn insert_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate()?;
    check_references(&builder, connection)?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (amount, transaction_type, description, date, \
                account_id, category_id, related_account_id, import_id, recurring_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount,
                builder.transaction_type,
                &builder.description,
                builder.date,
                builder.account_id,
                builder.category_id,
                builder.related_account_id,
                builder.import_id,
                builder.recurring_id,
            ),
            map_transaction_row,
        )?;

    apply_balance_effect(&transaction, connection)?;

    Ok(transaction)
}

/// Replace the details of a transaction.
///
/// The old balance effect is reverted and the new one applied in the same
/// database transaction, so moving a transaction between accounts keeps both
/// balances correct. The import ID and recurring transaction are kept.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if `id` does not refer to a
/// transaction, or the validation errors of [create_transaction].
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate()?;

    let sql_transaction = connection.unchecked_transaction()?;

    let old_transaction = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    check_references(&builder, &sql_transaction)?;
    revert_balance_effect(&old_transaction, &sql_transaction)?;

    let transaction = sql_transaction
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET amount = ?1,
                 transaction_type = ?2,
                 description = ?3,
                 date = ?4,
                 account_id = ?5,
                 category_id = ?6,
                 related_account_id = ?7
             WHERE id = ?8
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount,
                builder.transaction_type,
                &builder.description,
                builder.date,
                builder.account_id,
                builder.category_id,
                builder.related_account_id,
                id,
            ),
            map_transaction_row,
        )?;

    apply_balance_effect(&transaction, &sql_transaction)?;
    sql_transaction.commit()?;

    Ok(transaction)
}

/// Delete a transaction and revert its effect on the account balances.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if `id` does not refer to a transaction.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DeleteMissingTransaction),
        Err(error) => return Err(error),
    };

    revert_balance_effect(&transaction, &sql_transaction)?;
    sql_transaction.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;
    sql_transaction.commit()?;

    Ok(())
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Every transaction that changes the balance of `account_id`, either directly
/// or as the destination of a transfer.
pub fn get_transactions_touching_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE account_id = ?1 OR related_account_id = ?1
             ORDER BY date ASC, id ASC"
        ))?
        .query_map([account_id], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Whether a transaction with `import_id` has already been imported.
pub fn import_id_exists(import_id: i64, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM \"transaction\" WHERE import_id = ?1)",
            [import_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount > 0),
                transaction_type TEXT NOT NULL
                    CHECK (transaction_type IN ('income', 'expense', 'transfer')),
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                account_id INTEGER NOT NULL,
                category_id INTEGER,
                related_account_id INTEGER,
                import_id INTEGER UNIQUE,
                recurring_id INTEGER,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
                FOREIGN KEY(related_account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(recurring_id) REFERENCES recurring_transaction(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account ON \"transaction\"(account_id);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        transaction_type: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        account_id: row.get(5)?,
        category_id: row.get(6)?,
        related_account_id: row.get(7)?,
        import_id: row.get(8)?,
        recurring_id: row.get(9)?,
    })
}

fn check_references(builder: &TransactionBuilder, connection: &Connection) -> Result<(), Error> {
    if !row_exists("account", builder.account_id, connection)? {
        return Err(Error::InvalidAccount(builder.account_id));
    }

    if let Some(related_account_id) = builder.related_account_id
        && !row_exists("account", related_account_id, connection)?
    {
        return Err(Error::InvalidAccount(related_account_id));
    }

    if let Some(category_id) = builder.category_id
        && !row_exists("category", category_id, connection)?
    {
        return Err(Error::InvalidCategory(Some(category_id)));
    }

    Ok(())
}


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountForm, AccountKind, create_account, delete_account, get_account},
        category::{CategoryName, create_category, delete_category},
        test_utils::get_test_connection,
        transaction::{
            Transaction, TransactionType, create_transaction, delete_transaction,
            get_transaction, get_transactions_touching_account, update_transaction,
        },
    };

    fn create_test_account(name: &str, opening_balance: f64, connection: &Connection) -> i64 {
        create_account(
            &AccountForm::new(name, AccountKind::Checking, opening_balance),
            connection,
        )
        .expect("Could not create account")
        .id
    }

    fn balance(account_id: i64, connection: &Connection) -> f64 {
        get_account(account_id, connection)
            .expect("Could not get account")
            .current_balance
    }

    #[test]
    fn create_applies_balance_effect() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 100.0, &conn);
        let savings = create_test_account("Savings", 0.0, &conn);
        let today = date!(2025 - 10 - 05);

        create_transaction(Transaction::build(12.5, today, "Lunch", checking), &conn).unwrap();
        create_transaction(
            Transaction::build(50.0, today, "Pay", checking)
                .transaction_type(TransactionType::Income),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(30.0, today, "Save", checking)
                .transaction_type(TransactionType::Transfer)
                .related_account_id(Some(savings)),
            &conn,
        )
        .unwrap();

        assert_eq!(balance(checking, &conn), 107.5);
        assert_eq!(balance(savings, &conn), 30.0);
    }

    #[test]
    fn create_fails_on_missing_account() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build(1.0, date!(2025 - 10 - 05), "", 42), &conn);

        assert_eq!(result, Err(Error::InvalidAccount(42)));
    }

    #[test]
    fn create_fails_on_missing_destination_account() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 100.0, &conn);

        let result = create_transaction(
            Transaction::build(1.0, date!(2025 - 10 - 05), "", checking)
                .transaction_type(TransactionType::Transfer)
                .related_account_id(Some(42)),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAccount(42)));
        assert_eq!(balance(checking, &conn), 100.0);
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 0.0, &conn);

        let result = create_transaction(
            Transaction::build(123.45, date!(2025 - 10 - 04), "", checking).category_id(Some(42)),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(Some(42))));
    }

    #[test]
    fn create_fails_on_duplicate_import_id() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 0.0, &conn);
        let today = date!(2025 - 10 - 04);
        create_transaction(
            Transaction::build(123.45, today, "", checking).import_id(Some(123456789)),
            &conn,
        )
        .expect("Could not create transaction");

        let duplicate_transaction = create_transaction(
            Transaction::build(123.45, today, "", checking).import_id(Some(123456789)),
            &conn,
        );

        assert_eq!(duplicate_transaction, Err(Error::DuplicateImportId));
        assert_eq!(balance(checking, &conn), -123.45);
    }

    #[test]
    fn update_moves_balance_between_accounts() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 100.0, &conn);
        let savings = create_test_account("Savings", 100.0, &conn);
        let today = date!(2025 - 10 - 05);
        let transaction =
            create_transaction(Transaction::build(20.0, today, "Groceries", checking), &conn)
                .unwrap();

        let updated = update_transaction(
            transaction.id,
            Transaction::build(25.0, today, "Groceries", savings)
                .transaction_type(TransactionType::Income),
            &conn,
        )
        .unwrap();

        assert_eq!(updated.account_id, savings);
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(balance(checking, &conn), 100.0);
        assert_eq!(balance(savings, &conn), 125.0);
    }

    #[test]
    fn update_keeps_import_id() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 0.0, &conn);
        let today = date!(2025 - 10 - 05);
        let transaction = create_transaction(
            Transaction::build(20.0, today, "", checking).import_id(Some(7)),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            Transaction::build(21.0, today, "", checking),
            &conn,
        )
        .unwrap();

        assert_eq!(updated.import_id, Some(7));
    }

    #[test]
    fn update_missing_transaction() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 0.0, &conn);

        let result = update_transaction(
            42,
            Transaction::build(1.0, date!(2025 - 10 - 05), "", checking),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn failed_update_leaves_balances_unchanged() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 100.0, &conn);
        let today = date!(2025 - 10 - 05);
        let transaction =
            create_transaction(Transaction::build(20.0, today, "", checking), &conn).unwrap();

        let result = update_transaction(
            transaction.id,
            Transaction::build(20.0, today, "", checking).category_id(Some(42)),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(Some(42))));
        assert_eq!(balance(checking, &conn), 80.0);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn delete_reverts_transfer() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 100.0, &conn);
        let savings = create_test_account("Savings", 0.0, &conn);
        let transfer = create_transaction(
            Transaction::build(40.0, date!(2025 - 10 - 05), "", checking)
                .transaction_type(TransactionType::Transfer)
                .related_account_id(Some(savings)),
            &conn,
        )
        .unwrap();

        delete_transaction(transfer.id, &conn).unwrap();

        assert_eq!(balance(checking, &conn), 100.0);
        assert_eq!(balance(savings, &conn), 0.0);
        assert_eq!(get_transaction(transfer.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction() {
        let conn = get_test_connection();

        assert_eq!(delete_transaction(42, &conn), Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn touching_account_includes_incoming_transfers() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 100.0, &conn);
        let savings = create_test_account("Savings", 0.0, &conn);
        let today = date!(2025 - 10 - 05);
        create_transaction(Transaction::build(5.0, today, "", checking), &conn).unwrap();
        let transfer = create_transaction(
            Transaction::build(40.0, today, "", checking)
                .transaction_type(TransactionType::Transfer)
                .related_account_id(Some(savings)),
            &conn,
        )
        .unwrap();

        let got = get_transactions_touching_account(savings, &conn).unwrap();

        assert_eq!(got, vec![transfer]);
    }

    #[test]
    fn deleting_account_reverts_transfers_on_other_accounts() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 100.0, &conn);
        let savings = create_test_account("Savings", 0.0, &conn);
        create_transaction(
            Transaction::build(40.0, date!(2025 - 10 - 05), "", checking)
                .transaction_type(TransactionType::Transfer)
                .related_account_id(Some(savings)),
            &conn,
        )
        .unwrap();

        delete_account(savings, &conn).unwrap();

        assert_eq!(balance(checking, &conn), 100.0);
        assert!(get_transactions_touching_account(checking, &conn).unwrap().is_empty());
    }

    #[test]
    fn deleting_category_clears_it_on_transactions() {
        let conn = get_test_connection();
        let checking = create_test_account("Checking", 0.0, &conn);
        let category =
            create_category(CategoryName::new_unchecked("Food"), "", "#ffffff", &conn).unwrap();
        let transaction = create_transaction(
            Transaction::build(5.0, date!(2025 - 10 - 05), "", checking)
                .category_id(Some(category.id)),
            &conn,
        )
        .unwrap();

        delete_category(category.id, &conn).unwrap();

        let got = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(got.category_id, None);
    }

    #[test]
    fn effect_on_accounts() {
        let transfer = Transaction {
            id: 1,
            amount: 10.0,
            transaction_type: TransactionType::Transfer,
            description: String::new(),
            date: date!(2025 - 10 - 05),
            account_id: 1,
            category_id: None,
            related_account_id: Some(2),
            import_id: None,
            recurring_id: None,
        };

        assert_eq!(transfer.effect_on(1), -10.0);
        assert_eq!(transfer.effect_on(2), 10.0);
        assert_eq!(transfer.effect_on(3), 0.0);
    }
}
