//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The ledger that keeps account balances in step with transactions
//! - Database functions for storing, querying, and managing transactions
//! - View handlers for transaction-related web pages

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod ledger;
mod query;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionType, create_transaction,
    create_transaction_table, delete_transaction, get_transaction,
    get_transactions_touching_account, import_id_exists, map_transaction_row, update_transaction,
};
pub(crate) use core::insert_transaction;
pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use delete::delete_transaction_endpoint;
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub(crate) use ledger::revert_balance_effect;
pub use transactions_page::get_transactions_page;
