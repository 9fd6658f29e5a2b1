//! Monthly spending limits per category.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod list;

pub use core::{
    BudgetForm, BudgetId, BudgetProgress, BudgetStatus, create_budget,
    create_budget_table, delete_budget, get_budget, get_budget_progress, update_budget,
};
pub use create::{create_budget_endpoint, get_new_budget_page};
pub use delete::delete_budget_endpoint;
pub use edit::{get_edit_budget_page, update_budget_endpoint};
pub(crate) use list::budget_progress_list;
pub use list::get_budgets_page;
