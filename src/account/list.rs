//! The accounts page: every account with its bank and balance.

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
    account::{Account, favorite::favorite_button, get_all_accounts},
    bank::{Bank, BankId, get_all_banks},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, color_swatch, edit_delete_action_links,
        format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the accounts page.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the accounts page, favorites first, with the total of all balances.
pub async fn get_accounts_page(State(state): State<AccountsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?;
    let banks: HashMap<BankId, Bank> = get_all_banks(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve banks: {error}"))?
        .into_iter()
        .map(|bank| (bank.id, bank))
        .collect();

    Ok(accounts_view(&accounts, &banks).into_response())
}

fn accounts_view(accounts: &[Account], banks: &HashMap<BankId, Bank>) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let total_balance: f64 = accounts.iter().map(|account| account.current_balance).sum();

    let table_row = |account: &Account| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_ACCOUNT, account.id);
        let reconcile_url = endpoints::format_endpoint(endpoints::RECONCILE_ACCOUNT, account.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? All of its transactions will be deleted \
            and transfers will be reverted on the other accounts.",
            account.name
        );
        let bank = account.bank_id.and_then(|bank_id| banks.get(&bank_id));

        html!(
            tr class=(TABLE_ROW_STYLE) data-account-row="true"
            {
                td class=(TABLE_CELL_STYLE) { (favorite_button(account.id, account.is_favorite)) }

                th scope="row" class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (account.name)
                }

                td class=(TABLE_CELL_STYLE) { (account.kind.label()) }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(bank) = bank {
                        span class="inline-flex items-center gap-2"
                        {
                            (color_swatch(&bank.color))
                            (bank.name)
                        }
                    } @else {
                        "-"
                    }
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    span id=(format!("account-balance-{}", account.id))
                    {
                        (format_currency(account.current_balance))
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        button
                            type="button"
                            hx-post=(reconcile_url)
                            hx-swap="none"
                            hx-target-error="#alert-container"
                            class=(LINK_STYLE)
                        {
                            "Reconcile"
                        }

                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Accounts" }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Total balance: "
                            span id="total-balance" class="font-semibold text-gray-900 dark:text-white"
                            {
                                (format_currency(total_balance))
                            }
                        }
                    }

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Add Account"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Favorite" } }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Bank" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (table_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td colspan="6" class="px-6 py-4 text-center"
                                    {
                                        "No accounts yet. "
                                        a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                                        {
                                            "Add your first account"
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

    base("Accounts", &[], &content)
}
