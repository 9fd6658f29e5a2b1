//! Bank accounts, credit cards and wallets, and their running balances.

mod core;
mod create;
mod delete;
mod edit;
mod favorite;
mod form;
mod list;
mod reconcile;

pub use core::{
    Account, AccountForm, AccountId, AccountKind, Reconciliation, create_account,
    create_account_table, delete_account, get_account, get_all_accounts,
    get_total_account_balance, reconcile_account, toggle_favorite_account, update_account,
};
pub use create::{create_account_endpoint, get_new_account_page};
pub use delete::delete_account_endpoint;
pub use edit::{get_edit_account_page, update_account_endpoint};
pub use favorite::toggle_favorite_account_endpoint;
pub use list::get_accounts_page;
pub use reconcile::reconcile_account_endpoint;
