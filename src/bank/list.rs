//! Banks listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    bank::{Bank, db::count_accounts_per_bank, get_all_banks},
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, color_swatch, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the banks listing page.
#[derive(Debug, Clone)]
pub struct BanksPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BanksPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the banks listing page with the number of accounts at each bank.
pub async fn get_banks_page(State(state): State<BanksPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let banks = get_all_banks(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve banks: {error}"))?;
    let account_counts = count_accounts_per_bank(&connection)
        .inspect_err(|error| tracing::error!("Could not count accounts per bank: {error}"))?;

    let rows = banks
        .into_iter()
        .map(|bank| {
            let count = account_counts.get(&bank.id).copied().unwrap_or(0);
            (bank, count)
        })
        .collect::<Vec<_>>();

    Ok(banks_view(&rows).into_response())
}

fn banks_view(rows: &[(Bank, u32)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BANKS_VIEW).into_html();

    let table_row = |bank: &Bank, account_count: u32| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_BANK_VIEW, bank.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_BANK, bank.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? {account_count} account(s) will no longer \
            be linked to a bank.",
            bank.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-bank-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex items-center gap-2"
                    {
                        @if let Some(logo_url) = &bank.logo_url {
                            img src=(logo_url) alt="" class="w-6 h-6 rounded";
                        } @else {
                            (color_swatch(&bank.color))
                        }
                        span class="font-medium text-gray-900 dark:text-white" { (bank.name) }
                    }
                }

                td class=(TABLE_CELL_STYLE) { (account_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
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
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Banks" }
                    a href=(endpoints::NEW_BANK_VIEW) class=(LINK_STYLE) { "Add Bank" }
                }

                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Bank" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Accounts" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for (bank, account_count) in rows {
                            (table_row(bank, *account_count))
                        }

                        @if rows.is_empty() {
                            tr
                            {
                                td colspan="3" class="px-6 py-4 text-center"
                                {
                                    "No banks yet. "
                                    a href=(endpoints::NEW_BANK_VIEW) class=(LINK_STYLE)
                                    {
                                        "Add your first bank"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Banks", &[], &content)
}

#[cfg(test)]
mod tests {
    use axum::extract::State;

    use crate::{
        bank::{BankName, NewBank, create_bank, get_banks_page},
        test_utils::{
            assert_status_ok, assert_valid_html, get_test_db_connection, parse_html_document,
            select_texts,
        },
    };

    use super::BanksPageState;

    #[tokio::test]
    async fn lists_banks_with_account_counts() {
        let state = BanksPageState {
            db_connection: get_test_db_connection(),
        };
        create_bank(
            NewBank::new(BankName::new_unchecked("BNZ")),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_banks_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_texts(&html, "tr[data-bank-row] td:nth-child(2)"),
            ["0"]
        );
    }

    #[tokio::test]
    async fn shows_empty_message() {
        let state = BanksPageState {
            db_connection: get_test_db_connection(),
        };

        let response = get_banks_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert!(select_texts(&html, "tbody td")[0].starts_with("No banks yet."));
    }
}
