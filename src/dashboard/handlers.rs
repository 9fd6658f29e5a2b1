//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    account::get_total_account_balance,
    budget::{BudgetProgress, budget_progress_list, get_budget_progress},
    calendar::{DateRange, month_bounds, month_label},
    dashboard::{
        aggregation::{
            PeriodTotals, expenses_by_category, format_month_labels,
            group_monthly_expenses_by_category, last_twelve_months, monthly_totals, sum_totals,
        },
        cards::{expense_cards_view, summary_cards_view},
        charts::{DashboardChart, charts_script, charts_view, expenses_chart, income_expenses_chart},
        transaction::{DashboardTransaction, get_transactions_in_date_range},
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    month_label: String,
    month_totals: PeriodTotals,
    total_balance: f64,
    category_breakdown: Vec<(String, f64)>,
    budget_progress: Vec<BudgetProgress>,
    charts: [DashboardChart; 2],
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    match build_dashboard_data(today, &connection)? {
        Some(data) => Ok(dashboard_view(nav_bar, &data).into_response()),
        None => Ok(dashboard_no_data_view(nav_bar).into_response()),
    }
}

/// Fetches and builds all data needed for the dashboard display.
///
/// # Returns
/// All dashboard data ready for rendering, or `None` if there are no
/// transactions in the last twelve months.
///
/// # Errors
/// Returns an error if a database query fails.
fn build_dashboard_data(
    today: Date,
    connection: &Connection,
) -> Result<Option<DashboardData>, Error> {
    let months = last_twelve_months(today);
    let this_month = month_bounds(today);
    let chart_range = DateRange {
        start: months.first().copied().unwrap_or(this_month.start),
        end: this_month.end,
    };

    let transactions = get_transactions_in_date_range(chart_range, connection).inspect_err(
        |error| tracing::error!("Could not get transactions for last year: {error}"),
    )?;

    if transactions.is_empty() {
        return Ok(None);
    }

    let total_balance = get_total_account_balance(connection).inspect_err(|error| {
        tracing::error!("Could not calculate total account balance: {error}")
    })?;

    let budget_progress = get_budget_progress(this_month, connection)
        .inspect_err(|error| tracing::error!("Could not get budget progress: {error}"))?;

    let this_month_transactions: Vec<DashboardTransaction> = transactions
        .iter()
        .filter(|transaction| transaction.date >= this_month.start)
        .cloned()
        .collect();

    Ok(Some(DashboardData {
        month_label: month_label(today),
        month_totals: sum_totals(&this_month_transactions),
        total_balance,
        category_breakdown: expenses_by_category(&this_month_transactions),
        budget_progress,
        charts: build_dashboard_charts(&transactions, &months),
    }))
}

/// Creates the dashboard charts from the last twelve months of transactions.
fn build_dashboard_charts(
    transactions: &[DashboardTransaction],
    months: &[Date],
) -> [DashboardChart; 2] {
    let labels = format_month_labels(months);

    [
        DashboardChart {
            id: "income-expenses-chart",
            options: income_expenses_chart(&labels, &monthly_totals(transactions, months))
                .to_string(),
        },
        DashboardChart {
            id: "expenses-chart",
            options: expenses_chart(
                &labels,
                group_monthly_expenses_by_category(transactions, months),
            )
            .to_string(),
        },
    ]
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "manually");
    let import_transaction_link = link(endpoints::IMPORT_VIEW, "importing");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your summary and charts will show up here once you add some transactions.
                You can add transactions " (new_transaction_link) " or
                by " (import_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(nav_bar: NavBar, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards_view(&data.month_label, data.month_totals, data.total_balance))

            (expense_cards_view(&data.category_breakdown))

            section id="budgets-overview" class="w-full mx-auto mb-8"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h3 class="text-xl font-semibold" { "Budgets" }
                    (link(endpoints::BUDGETS_VIEW, "Manage budgets"))
                }

                @if data.budget_progress.is_empty() {
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "No budgets yet. "
                        (link(endpoints::NEW_BUDGET_VIEW, "Set a monthly budget"))
                        " for a category to track your spending."
                    }
                } @else {
                    (budget_progress_list(&data.budget_progress, false))
                }
            }

            (charts_view(&data.charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::{Date, OffsetDateTime};

    use crate::{
        account::{AccountForm, AccountKind, create_account},
        budget::{BudgetForm, create_budget},
        category::{CategoryName, create_category},
        test_utils::{
            assert_valid_html, get_test_db_connection, parse_html_document, select_texts,
        },
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn today() -> Date {
        OffsetDateTime::now_utc().date()
    }

    fn seed(connection: &Connection) {
        let everyday = create_account(
            &AccountForm::new("Everyday", AccountKind::Checking, 100.0),
            connection,
        )
        .unwrap();
        let savings = create_account(
            &AccountForm::new("Savings", AccountKind::Savings, 0.0),
            connection,
        )
        .unwrap();
        let food = create_category(CategoryName::new_unchecked("Food"), "", "#00ff00", connection)
            .unwrap();
        create_budget(
            &BudgetForm {
                category_id: food.id,
                amount: 200.0,
            },
            connection,
        )
        .unwrap();

        create_transaction(
            Transaction::build(500.0, today(), "Pay", everyday.id)
                .transaction_type(TransactionType::Income),
            connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(40.0, today(), "Groceries", everyday.id)
                .transaction_type(TransactionType::Expense)
                .category_id(Some(food.id)),
            connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(10.0, today(), "Parking", everyday.id)
                .transaction_type(TransactionType::Expense),
            connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(300.0, today(), "Save", everyday.id)
                .transaction_type(TransactionType::Transfer)
                .related_account_id(Some(savings.id)),
            connection,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn dashboard_shows_month_summary_without_transfers() {
        let state = DashboardState {
            db_connection: get_test_db_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        };
        seed(&state.db_connection.lock().unwrap());

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, "#summary-income"), vec!["$500.00"]);
        assert_eq!(select_texts(&html, "#summary-expenses"), vec!["$50.00"]);
        assert_eq!(select_texts(&html, "#summary-net"), vec!["$450.00"]);
        assert_eq!(select_texts(&html, "#summary-balance"), vec!["$550.00"]);
        assert_eq!(
            select_texts(&html, "[data-category-card] h4"),
            vec!["Food", "Other"]
        );
        assert_eq!(select_texts(&html, "li[data-budget-row]").len(), 1);
        assert_eq!(select_texts(&html, "#income-expenses-chart").len(), 1);
        assert_eq!(select_texts(&html, "#expenses-chart").len(), 1);
    }

    #[tokio::test]
    async fn dashboard_without_transactions_shows_prompt() {
        let state = DashboardState {
            db_connection: get_test_db_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(select_texts(&html, "h2").contains(&"Nothing here yet...".to_owned()));
    }
}
