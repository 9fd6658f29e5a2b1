//! Recurring transactions: bills, subscriptions and salaries that generate a
//! real transaction every time they are due.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod list;
mod process;
mod run_due;
mod status;

pub use core::{
    Frequency, RecurringForm, RecurringId, RecurringStatus, RecurringTransaction, RecurringType,
    create_recurring_transaction, create_recurring_transaction_table,
    delete_recurring_transaction, get_all_recurring_transactions, get_recurring_transaction,
    toggle_recurring_status, update_recurring_transaction,
};
pub use create::{create_recurring_endpoint, get_new_recurring_page};
pub use delete::delete_recurring_endpoint;
pub use edit::{get_edit_recurring_page, update_recurring_endpoint};
pub use list::get_recurring_page;
pub use process::{ProcessResult, process_due_recurring};
pub use run_due::run_due_recurring_endpoint;
pub use status::toggle_recurring_status_endpoint;
