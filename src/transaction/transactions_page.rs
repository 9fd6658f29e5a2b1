//! Defines the route handler for the page that displays transactions as a table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_all_accounts},
    calendar::parse_month,
    category::{Category, CategoryId, get_all_categories},
    endpoints,
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    pagination::{
        PaginationConfig, PaginationIndicator, create_pagination_indicators, page_count,
    },
    transaction::{
        TransactionType,
        query::{
            TransactionFilter, TransactionTableRow, count_transactions,
            query_transaction_table_rows,
        },
    },
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The most rows a client can ask for in one page.
const MAX_PAGE_SIZE: u64 = 200;

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Configuration for pagination controls.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for paging through and filtering transactions.
///
/// Empty parameters, e.g. from the "All accounts" option, are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    /// The page number to display. Starts from 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// The maximum number of transactions to display per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// A month in the format `YYYY-MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl TransactionsQuery {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            account_id: self.account_id,
            category_id: self.category_id,
            transaction_type: self.transaction_type,
            month: self.month.as_deref().and_then(parse_month),
        }
    }

    /// The URL of `page` with the same filters.
    fn page_url(&self, page: u64) -> String {
        let query = TransactionsQuery {
            page: Some(page),
            ..self.clone()
        };

        match serde_urlencoded::to_string(&query) {
            Ok(query_string) => format!("{}?{query_string}", endpoints::TRANSACTIONS_VIEW),
            Err(error) => {
                tracing::error!("Could not encode transactions query {query:?}: {error}");
                format!("{}?page={page}", endpoints::TRANSACTIONS_VIEW)
            }
        }
    }
}

/// Render an overview of the transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let config = &state.pagination_config;
    let per_page = query
        .per_page
        .unwrap_or(config.default_page_size)
        .clamp(1, MAX_PAGE_SIZE);
    let filter = query.filter();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction_count = count_transactions(&filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to count transactions: {error}"))?;
    let page_count = page_count(transaction_count, per_page);
    let current_page = query
        .page
        .unwrap_or(config.default_page)
        .clamp(1, page_count);
    let offset = (current_page - 1) * per_page;

    let rows = query_transaction_table_rows(&filter, per_page, offset, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;
    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let indicators = create_pagination_indicators(current_page, page_count, config.max_pages);

    Ok(transactions_view(
        &rows,
        &query,
        &filter,
        &accounts,
        &categories,
        &indicators,
        transaction_count,
    )
    .into_response())
}

fn transactions_view(
    rows: &[TransactionTableRow],
    query: &TransactionsQuery,
    filter: &TransactionFilter,
    accounts: &[Account],
    categories: &[Category],
    indicators: &[PaginationIndicator],
    transaction_count: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

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
                        h1 class="text-xl font-bold" { "Transactions" }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (transaction_count) " matching transactions"
                        }
                    }

                    div class="flex gap-2"
                    {
                        a href=(endpoints::IMPORT_VIEW) class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Import"
                        }

                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Add Transaction"
                        }
                    }
                }

                (filter_form(query, accounts, categories))

                div class="overflow-x-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (transaction_row(row, filter.account_id))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td colspan="6" class="px-6 py-4 text-center"
                                    {
                                        "No transactions found. "
                                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                                        {
                                            "Record a transaction"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                (pagination_view(indicators, query))
            }
        }
    );

    base("Transactions", &[], &content)
}

fn filter_form(query: &TransactionsQuery, accounts: &[Account], categories: &[Category]) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-2 md:grid-cols-5 gap-4 items-end"
        {
            div
            {
                label for="filter-account" class=(FORM_LABEL_STYLE) { "Account" }
                select id="filter-account" name="account_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All accounts" }
                    @for account in accounts {
                        option value=(account.id) selected[query.account_id == Some(account.id)]
                        {
                            (account.name)
                        }
                    }
                }
            }

            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="filter-category" name="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }
                    @for category in categories {
                        option value=(category.id) selected[query.category_id == Some(category.id)]
                        {
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="filter-type" class=(FORM_LABEL_STYLE) { "Type" }
                select id="filter-type" name="transaction_type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All types" }
                    @for transaction_type in TransactionType::ALL {
                        option
                            value=(transaction_type.as_str())
                            selected[query.transaction_type == Some(transaction_type)]
                        {
                            (transaction_type.label())
                        }
                    }
                }
            }

            div
            {
                label for="filter-month" class=(FORM_LABEL_STYLE) { "Month" }
                input
                    id="filter-month"
                    type="month"
                    name="month"
                    value=[query.month.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    )
}

fn transaction_row(row: &TransactionTableRow, filtered_account: Option<AccountId>) -> Markup {
    let transaction = &row.transaction;
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let signed_amount =
        transaction.effect_on(filtered_account.unwrap_or(transaction.account_id));
    let (description, full_description) = format_description(&transaction.description);

    let amount_style = match transaction.transaction_type {
        TransactionType::Transfer => "text-gray-700 dark:text-gray-300",
        _ if signed_amount < 0.0 => "text-red-700 dark:text-red-300",
        _ => "text-green-700 dark:text-green-300",
    };

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class="px-6 py-4 whitespace-nowrap" { (transaction.date) }

            td class=(TABLE_CELL_STYLE) title=[full_description] { (description) }

            td class=(TABLE_CELL_STYLE)
            {
                (row.account_name)
                @if let Some(related_account_name) = &row.related_account_name {
                    " → " (related_account_name)
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(category_name) = &row.category_name {
                    span
                        class=(BADGE_STYLE)
                        style=[row.category_color.as_ref().map(|color| format!("border: 1px solid {color};"))]
                    {
                        @if let Some(icon) = &row.category_icon {
                            (icon)
                        }
                        (category_name)
                    }
                } @else {
                    "-"
                }
            }

            td class={ "px-6 py-4 text-right tabular-nums " (amount_style) }
            {
                (format_currency(signed_amount))
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        "Are you sure you want to delete this transaction? \
                        The account balances will be updated.",
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    )
}

fn pagination_view(indicators: &[PaginationIndicator], query: &TransactionsQuery) -> Markup {
    let page_link_style = "px-3 py-2 rounded hover:bg-gray-100 dark:hover:bg-gray-700";

    html!(
        nav aria-label="Transaction pages" class="flex justify-center"
        {
            ul class="inline-flex items-center gap-1"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(query.page_url(*page)) class=(page_link_style) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span
                                    aria-current="page"
                                    class="px-3 py-2 rounded font-bold text-white bg-blue-600"
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-3 py-2" { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(query.page_url(*page)) class=(page_link_style) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(query.page_url(*page)) class=(page_link_style) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}
