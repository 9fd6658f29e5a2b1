//! Dashboard module
//!
//! Provides an overview page with this month's totals, expenses by category,
//! budget progress and charts of the last twelve months, plus a JSON
//! endpoint predicting this month's and next month's expenses.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod prediction;
mod transaction;

pub use handlers::get_dashboard_page;
pub use prediction::get_prediction;
