//! Categories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, db::count_transactions_per_category, get_all_categories},
    endpoints,
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, color_swatch, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

struct CategoryRow {
    category: Category,
    transaction_count: u32,
}

/// Render the categories listing page with transaction counts.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let counts = count_transactions_per_category(&connection).inspect_err(|error| {
        tracing::error!("Could not count transactions per category: {error}")
    })?;

    let rows = categories
        .into_iter()
        .map(|category| CategoryRow {
            transaction_count: counts.get(&category.id).copied().unwrap_or(0),
            category,
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&rows).into_response())
}

fn categories_view(rows: &[CategoryRow]) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let table_row = |row: &CategoryRow| {
        let category = &row.category;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, category.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? {} transaction(s) will become uncategorized \
            and its budget will be removed.",
            category.name, row.transaction_count
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-category-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE)
                    {
                        (color_swatch(&category.color))
                        @if !category.icon.is_empty() {
                            span { (category.icon) }
                        }
                        span { (category.name) }
                    }
                }

                td class=(TABLE_CELL_STYLE) { (row.transaction_count) }

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
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(new_category_route) class=(LINK_STYLE) { "Create Category" }
                }

                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            (table_row(row))
                        }

                        @if rows.is_empty() {
                            tr
                            {
                                td colspan="3" class="px-6 py-4 text-center"
                                {
                                    "No categories created yet. "
                                    a href=(new_category_route) class=(LINK_STYLE)
                                    {
                                        "Create your first category"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}
