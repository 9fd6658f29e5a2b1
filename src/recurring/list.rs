//! The recurring transactions page with the subscription summary.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, get_all_accounts},
    category::{Category, CategoryId, get_all_categories},
    endpoints,
    html::{
        BADGE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    recurring::{
        RecurringTransaction, RecurringType, get_all_recurring_transactions,
        status::status_button,
    },
};

/// The state needed for the recurring transactions page.
#[derive(Debug, Clone)]
pub struct RecurringPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The cost of the active recurring expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SubscriptionSummary {
    active_count: usize,
    monthly_total: f64,
}

impl SubscriptionSummary {
    fn new(recurring_transactions: &[RecurringTransaction]) -> Self {
        recurring_transactions
            .iter()
            .filter(|recurring| {
                recurring.is_active() && recurring.recurring_type == RecurringType::Expense
            })
            .fold(Self::default(), |summary, recurring| Self {
                active_count: summary.active_count + 1,
                monthly_total: summary.monthly_total + recurring.monthly_equivalent(),
            })
    }

    fn yearly_total(&self) -> f64 {
        self.monthly_total * 12.0
    }
}

/// Render the recurring transactions, soonest next run first.
pub async fn get_recurring_page(
    State(state): State<RecurringPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let recurring_transactions = get_all_recurring_transactions(&connection).inspect_err(
        |error| tracing::error!("Failed to retrieve recurring transactions: {error}"),
    )?;
    let account_names: HashMap<AccountId, String> = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?
        .into_iter()
        .map(|account| (account.id, account.name))
        .collect();
    let categories: HashMap<CategoryId, Category> = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?
        .into_iter()
        .map(|category| (category.id, category))
        .collect();

    Ok(recurring_view(&recurring_transactions, &account_names, &categories).into_response())
}

fn recurring_view(
    recurring_transactions: &[RecurringTransaction],
    account_names: &HashMap<AccountId, String>,
    categories: &HashMap<CategoryId, Category>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECURRING_VIEW).into_html();
    let summary = SubscriptionSummary::new(recurring_transactions);

    let table_row = |recurring: &RecurringTransaction| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_RECURRING_VIEW, recurring.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_RECURRING, recurring.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Transactions it already created are kept.",
            recurring.description
        );
        let category = recurring
            .category_id
            .and_then(|category_id| categories.get(&category_id));
        let amount_style = match recurring.recurring_type {
            RecurringType::Income => "px-6 py-4 text-right tabular-nums text-green-600 dark:text-green-400",
            RecurringType::Expense => "px-6 py-4 text-right tabular-nums",
        };

        html!(
            tr class=(TABLE_ROW_STYLE) data-recurring-row="true"
            {
                th scope="row" class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (recurring.description)
                }

                td class=(amount_style) { (format_currency(recurring.amount)) }

                td class=(TABLE_CELL_STYLE) { (recurring.frequency.label()) }

                td class=(TABLE_CELL_STYLE) { (recurring.next_run_date) }

                td class=(TABLE_CELL_STYLE)
                {
                    (account_names.get(&recurring.account_id).map(String::as_str).unwrap_or("-"))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(category) = category {
                        span class=(BADGE_STYLE) { (category.icon) " " (category.name) }
                    } @else {
                        "-"
                    }
                }

                td class=(TABLE_CELL_STYLE) { (status_button(recurring.id, recurring.status)) }

                td class=(TABLE_CELL_STYLE)
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Recurring Transactions" }

                    div class="flex gap-2"
                    {
                        button
                            type="button"
                            hx-post=(endpoints::RUN_DUE_RECURRING)
                            hx-swap="none"
                            hx-target-error="#alert-container"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Run Due Now"
                        }

                        a href=(endpoints::NEW_RECURRING_VIEW) class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Add Recurring"
                        }
                    }
                }

                div
                    id="subscription-summary"
                    class="p-4 rounded-lg bg-white shadow dark:bg-gray-800"
                {
                    h2 class="text-lg font-semibold" { "Subscriptions" }
                    p
                    {
                        span id="subscription-count" { (summary.active_count) }
                        " active, costing "
                        span id="subscription-monthly" class="font-semibold"
                        {
                            (format_currency(summary.monthly_total))
                        }
                        " per month ("
                        span id="subscription-yearly" { (format_currency(summary.yearly_total())) }
                        " per year)"
                    }
                }

                div class="overflow-x-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Frequency" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Next Run" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for recurring in recurring_transactions {
                                (table_row(recurring))
                            }

                            @if recurring_transactions.is_empty() {
                                tr
                                {
                                    td colspan="8" class="px-6 py-4 text-center"
                                    {
                                        "No recurring transactions yet. "
                                        a href=(endpoints::NEW_RECURRING_VIEW) class=(LINK_STYLE)
                                        {
                                            "Add a bill, subscription or salary"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Recurring Transactions", &[], &content)
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountForm, AccountKind, create_account},
        recurring::{
            Frequency, RecurringForm, RecurringType, create_recurring_transaction,
            get_recurring_page, toggle_recurring_status,
        },
        test_utils::{
            assert_status_ok, assert_valid_html, get_test_db_connection, parse_html_document,
            select_texts,
        },
    };

    use super::RecurringPageState;

    fn create_recurring(
        connection: &Connection,
        description: &str,
        amount: f64,
        recurring_type: RecurringType,
        frequency: Frequency,
    ) -> i64 {
        create_recurring_transaction(
            &RecurringForm {
                description: description.to_owned(),
                amount,
                recurring_type,
                frequency,
                start_date: date!(2025 - 01 - 01),
                account_id: 1,
                category_id: None,
            },
            connection,
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn shows_recurring_and_subscription_summary() {
        let state = RecurringPageState {
            db_connection: get_test_db_connection(),
        };
        {
            let connection = state.db_connection.lock().unwrap();
            create_account(
                &AccountForm::new("Everyday", AccountKind::Checking, 0.0),
                &connection,
            )
            .unwrap();
            create_recurring(&connection, "Streaming", 15.0, RecurringType::Expense, Frequency::Monthly);
            create_recurring(&connection, "Domain", 24.0, RecurringType::Expense, Frequency::Yearly);
            create_recurring(&connection, "Salary", 2000.0, RecurringType::Income, Frequency::BiWeekly);
            let paused =
                create_recurring(&connection, "Gym", 50.0, RecurringType::Expense, Frequency::Monthly);
            toggle_recurring_status(paused, &connection).unwrap();
        }

        let response = get_recurring_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, "tr[data-recurring-row] th").len(), 4);
        assert_eq!(select_texts(&html, "#subscription-count"), ["2"]);
        assert_eq!(select_texts(&html, "#subscription-monthly"), ["$17.00"]);
        assert_eq!(select_texts(&html, "#subscription-yearly"), ["$204.00"]);
    }

    #[tokio::test]
    async fn shows_empty_message() {
        let state = RecurringPageState {
            db_connection: get_test_db_connection(),
        };

        let response = get_recurring_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(select_texts(&html, "tbody td")[0].starts_with("No recurring transactions yet."));
    }
}
