//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for importing transactions from CSV and XLSX files.
pub const IMPORT_VIEW: &str = "/transactions/import";
/// The page for listing accounts and their balances.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for creating a new account.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page for editing an existing account.
pub const EDIT_ACCOUNT_VIEW: &str = "/accounts/{account_id}/edit";
/// The page for listing banks.
pub const BANKS_VIEW: &str = "/banks";
/// The page for creating a new bank.
pub const NEW_BANK_VIEW: &str = "/banks/new";
/// The page for editing an existing bank.
pub const EDIT_BANK_VIEW: &str = "/banks/{bank_id}/edit";
/// The page for listing categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for listing recurring transactions and subscriptions.
pub const RECURRING_VIEW: &str = "/recurring";
/// The page for creating a new recurring transaction.
pub const NEW_RECURRING_VIEW: &str = "/recurring/new";
/// The page for editing an existing recurring transaction.
pub const EDIT_RECURRING_VIEW: &str = "/recurring/{recurring_id}/edit";
/// The page for listing budgets and their progress.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The page for creating a new budget.
pub const NEW_BUDGET_VIEW: &str = "/budgets/new";
/// The page for editing an existing budget.
pub const EDIT_BUDGET_VIEW: &str = "/budgets/{budget_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route to create a transaction.
pub const POST_TRANSACTION: &str = "/api/transactions";
/// The route to update a transaction.
pub const PUT_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to upload a file and get the column mapping form for an import.
pub const IMPORT_UPLOAD: &str = "/api/import/upload";
/// The route to import the rows of an uploaded file with a column mapping.
pub const IMPORT: &str = "/api/import";
/// The route to create an account.
pub const POST_ACCOUNT: &str = "/api/accounts";
/// The route to update an account.
pub const PUT_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to delete an account.
pub const DELETE_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to mark or unmark an account as a favorite.
pub const TOGGLE_FAVORITE_ACCOUNT: &str = "/api/accounts/{account_id}/favorite";
/// The route to recompute an account's balance from its transactions.
pub const RECONCILE_ACCOUNT: &str = "/api/accounts/{account_id}/reconcile";
/// The route to create a bank.
pub const POST_BANK: &str = "/api/banks";
/// The route to update a bank.
pub const PUT_BANK: &str = "/api/banks/{bank_id}";
/// The route to delete a bank.
pub const DELETE_BANK: &str = "/api/banks/{bank_id}";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create a recurring transaction.
pub const POST_RECURRING: &str = "/api/recurring";
/// The route to update a recurring transaction.
pub const PUT_RECURRING: &str = "/api/recurring/{recurring_id}";
/// The route to delete a recurring transaction.
pub const DELETE_RECURRING: &str = "/api/recurring/{recurring_id}";
/// The route to pause or resume a recurring transaction.
pub const TOGGLE_RECURRING_STATUS: &str = "/api/recurring/{recurring_id}/status";
/// The route to generate the transactions for all due recurring transactions.
pub const RUN_DUE_RECURRING: &str = "/api/recurring/run";
/// The route to create a budget.
pub const POST_BUDGET: &str = "/api/budgets";
/// The route to update a budget.
pub const PUT_BUDGET: &str = "/api/budgets/{budget_id}";
/// The route to delete a budget.
pub const DELETE_BUDGET: &str = "/api/budgets/{budget_id}";
/// The route to get the spending prediction as JSON.
pub const PREDICTION: &str = "/api/prediction";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
