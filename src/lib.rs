//! Moneywise is a web app for tracking personal finances: banks, accounts,
//! transactions, recurring transactions, budgets and spending analytics.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod bank;
mod budget;
mod calendar;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error_pages;
mod html;
mod import;
mod logging;
mod navigation;
mod pagination;
mod recurring;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use recurring::{ProcessResult, process_due_recurring};
pub use routing::build_router;
pub use timezone::{get_local_offset, local_today};

/// Types and functions for populating a database outside of the web server,
/// e.g. for seeding a database for manual testing.
pub mod seed {
    pub use crate::account::{AccountForm, AccountKind, create_account};
    pub use crate::bank::{BankName, NewBank, create_bank};
    pub use crate::budget::{BudgetForm, create_budget};
    pub use crate::category::{CategoryName, create_category};
    pub use crate::recurring::{
        Frequency, RecurringForm, RecurringTransaction, RecurringType,
        create_recurring_transaction,
    };
    pub use crate::transaction::{Transaction, TransactionType, create_transaction};
}

use crate::{
    account::AccountId,
    alert::Alert,
    category::CategoryId,
    error_pages::{InternalServerError, get_404_not_found_response},
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction or recurring transaction amount was zero or negative.
    ///
    /// Amounts are always stored as positive numbers, the transaction type
    /// decides the direction money flows in.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The category ID used for a transaction, recurring transaction or budget did not match a
    /// valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// The account ID used for a transaction did not match a valid account.
    #[error("the account ID {0} does not refer to a valid account")]
    InvalidAccount(AccountId),

    /// The bank ID used for an account did not match a valid bank.
    #[error("the bank ID does not refer to a valid bank")]
    InvalidBank,

    /// A transfer was submitted without a destination account.
    #[error("a transfer needs a destination account")]
    TransferMissingDestination,

    /// A transfer was submitted with the same source and destination account.
    #[error("cannot transfer money from an account to itself")]
    TransferToSameAccount,

    /// A transfer was submitted with a category, transfers are not income or expenses.
    #[error("transfers cannot have a category")]
    TransferWithCategory,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used to create a bank name.
    #[error("Bank name cannot be empty")]
    EmptyBankName,

    /// An empty string was used to create an account name.
    #[error("Account name cannot be empty")]
    EmptyAccountName,

    /// A recurring transaction was given an empty description.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// A display color was not a hex color code like `#1a2b3c`.
    #[error("\"{0}\" is not a valid color, expected a hex code like #1a2b3c")]
    InvalidColor(String),

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// The specified bank name already exists in the database.
    #[error("the bank \"{0}\" already exists in the database")]
    DuplicateBankName(String),

    /// A budget already exists for the category.
    #[error("a budget already exists for this category")]
    DuplicateBudget,

    /// The specified import ID already exists in the database.
    ///
    /// When importing transactions from a file, an import ID is used to
    /// uniquely identify each transaction. Rejecting duplicate import IDs
    /// avoids importing the same transaction multiple times, which is likely
    /// to happen if the user tries to import files that overlap in time.
    #[error("the import ID already exists in the database")]
    DuplicateImportId,

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file is neither a CSV nor an XLSX file.
    #[error("File must be a CSV or XLSX spreadsheet")]
    UnsupportedFileType,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The spreadsheet had issues that prevented it from being parsed.
    #[error("Could not read the spreadsheet: {0}")]
    InvalidSpreadsheet(String),

    /// The column mapping for an import refers to missing columns or is incomplete.
    #[error("invalid column mapping: {0}")]
    InvalidColumnMapping(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to update a bank that does not exist
    #[error("tried to update a bank that is not in the database")]
    UpdateMissingBank,

    /// Tried to delete a bank that does not exist
    #[error("tried to delete a bank that is not in the database")]
    DeleteMissingBank,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a recurring transaction that does not exist
    #[error("tried to update a recurring transaction that is not in the database")]
    UpdateMissingRecurring,

    /// Tried to delete a recurring transaction that does not exist
    #[error("tried to delete a recurring transaction that is not in the database")]
    DeleteMissingRecurring,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("transaction.import_id") =>
            {
                Error::DuplicateImportId
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("budget.category_id") =>
            {
                Error::DuplicateBudget
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, message, details) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                "Invalid transaction date",
                format!("{date} is a date in the future, which is not allowed."),
            ),
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                "Invalid amount",
                format!(
                    "{amount} is not a valid amount. Enter an amount greater than zero \
                    and choose income or expense to set the direction."
                ),
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                "Invalid category",
                format!("Could not find a category with the ID {category_id:?}"),
            ),
            Error::InvalidAccount(account_id) => (
                StatusCode::BAD_REQUEST,
                "Invalid account",
                format!("Could not find an account with the ID {account_id}"),
            ),
            Error::InvalidBank => (
                StatusCode::BAD_REQUEST,
                "Invalid bank",
                "The selected bank could not be found.".to_owned(),
            ),
            Error::TransferMissingDestination => (
                StatusCode::BAD_REQUEST,
                "Missing destination account",
                "Choose the account the money is transferred to.".to_owned(),
            ),
            Error::TransferToSameAccount => (
                StatusCode::BAD_REQUEST,
                "Invalid transfer",
                "The source and destination accounts must be different.".to_owned(),
            ),
            Error::TransferWithCategory => (
                StatusCode::BAD_REQUEST,
                "Invalid transfer",
                "Transfers are not income or expenses and cannot have a category.".to_owned(),
            ),
            error @ (Error::EmptyCategoryName
            | Error::EmptyBankName
            | Error::EmptyAccountName
            | Error::EmptyDescription
            | Error::InvalidColor(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid form", error.to_string())
            }
            Error::DuplicateAccountName(name) => (
                StatusCode::BAD_REQUEST,
                "Duplicate Account Name",
                format!(
                    "The account {name} already exists in the database. \
                    Choose a different account name, or edit or delete the existing account.",
                ),
            ),
            Error::DuplicateBankName(name) => (
                StatusCode::BAD_REQUEST,
                "Duplicate Bank Name",
                format!(
                    "The bank {name} already exists in the database. \
                    Choose a different bank name, or edit or delete the existing bank.",
                ),
            ),
            Error::DuplicateCategoryName(name) => (
                StatusCode::BAD_REQUEST,
                "Duplicate Category Name",
                format!(
                    "The category {name} already exists in the database. \
                    Choose a different category name, or edit or delete the existing category.",
                ),
            ),
            Error::DuplicateBudget => (
                StatusCode::BAD_REQUEST,
                "Duplicate Budget",
                "A budget already exists for this category. Edit the existing budget instead."
                    .to_owned(),
            ),
            error @ (Error::UnsupportedFileType
            | Error::InvalidCSV(_)
            | Error::InvalidSpreadsheet(_)
            | Error::InvalidColumnMapping(_)
            | Error::MultipartError(_)) => {
                (StatusCode::BAD_REQUEST, "Import failed", error.to_string())
            }
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The requested item could not be found. \
                Try refreshing the page to see if it has been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not update transaction",
                "The transaction could not be found.".to_owned(),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingAccount => (
                StatusCode::NOT_FOUND,
                "Could not update account",
                "The account could not be found.".to_owned(),
            ),
            Error::DeleteMissingAccount => (
                StatusCode::NOT_FOUND,
                "Could not delete account",
                "The account could not be found. \
                Try refreshing the page to see if the account has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingBank => (
                StatusCode::NOT_FOUND,
                "Could not update bank",
                "The bank could not be found.".to_owned(),
            ),
            Error::DeleteMissingBank => (
                StatusCode::NOT_FOUND,
                "Could not delete bank",
                "The bank could not be found. \
                Try refreshing the page to see if the bank has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                "Could not update category",
                "The category could not be found.".to_owned(),
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                "Could not delete category",
                "The category could not be found. \
                Try refreshing the page to see if the category has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingRecurring => (
                StatusCode::NOT_FOUND,
                "Could not update recurring transaction",
                "The recurring transaction could not be found.".to_owned(),
            ),
            Error::DeleteMissingRecurring => (
                StatusCode::NOT_FOUND,
                "Could not delete recurring transaction",
                "The recurring transaction could not be found. \
                Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingBudget => (
                StatusCode::NOT_FOUND,
                "Could not update budget",
                "The budget could not be found.".to_owned(),
            ),
            Error::DeleteMissingBudget => (
                StatusCode::NOT_FOUND,
                "Could not delete budget",
                "The budget could not be found. \
                Try refreshing the page to see if the budget has already been deleted."
                    .to_owned(),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (
            status_code,
            Alert::Error {
                message: message.to_owned(),
                details,
            }
            .into_html(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;

    use crate::Error;

    #[test]
    fn maps_no_rows_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::NonPositiveAmount(-1.0).into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let response = Error::DeleteMissingTransaction.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unexpected_errors_are_server_errors() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
