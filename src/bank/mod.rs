//! Banks that hold a user's accounts.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_bank_endpoint, get_new_bank_page};
pub use db::{create_bank, create_bank_table, delete_bank, get_all_banks, get_bank, update_bank};
pub use delete::delete_bank_endpoint;
pub use domain::{Bank, BankFormData, BankId, BankName, DEFAULT_BANK_COLOR, NewBank};
pub use edit::{get_edit_bank_page, update_bank_endpoint};
pub use list::get_banks_page;
