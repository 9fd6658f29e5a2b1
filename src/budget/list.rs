//! The budgets page showing this month's spending against each budget.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{BudgetProgress, BudgetStatus, get_budget_progress},
    calendar::{month_bounds, month_label},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, color_swatch,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the budgets with their progress for the current month.
pub async fn get_budgets_page(State(state): State<BudgetsPageState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let progress = get_budget_progress(month_bounds(today), &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve budget progress: {error}"))?;

    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-4xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Budgets" }
                        p class="text-sm text-gray-500 dark:text-gray-400" { (month_label(today)) }
                    }

                    a href=(endpoints::NEW_BUDGET_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Add Budget"
                    }
                }

                @if progress.is_empty() {
                    p
                    {
                        "No budgets yet. "
                        a href=(endpoints::NEW_BUDGET_VIEW) class=(LINK_STYLE)
                        {
                            "Set a monthly limit for a category"
                        }
                    }
                } @else {
                    (budget_progress_list(&progress, true))
                }
            }
        }
    );

    Ok(base("Budgets", &[], &content).into_response())
}

/// A card per budget with a progress bar, optionally with edit and delete links.
pub(crate) fn budget_progress_list(progress: &[BudgetProgress], show_actions: bool) -> Markup {
    html!(
        ul class="space-y-3"
        {
            @for item in progress {
                (budget_progress_card(item, show_actions))
            }
        }
    )
}

fn budget_progress_card(progress: &BudgetProgress, show_actions: bool) -> Markup {
    let status = progress.status();
    let bar_color = match status {
        BudgetStatus::UnderBudget => "bg-green-500",
        BudgetStatus::NearLimit => "bg-yellow-400",
        BudgetStatus::OverBudget => "bg-red-600",
    };
    let bar_width = progress.percent().clamp(0.0, 100.0);
    let remaining = progress.remaining();

    html!(
        li
            class="p-4 rounded-lg bg-white shadow dark:bg-gray-800"
            data-budget-row="true"
            data-status=(status_attribute(status))
        {
            div class="flex justify-between items-center gap-4"
            {
                span class="inline-flex items-center gap-2 font-semibold"
                {
                    (color_swatch(&progress.category_color))
                    (progress.category_icon) " " (progress.category_name)
                }

                span class="text-sm tabular-nums"
                {
                    span class="budget-spent" { (format_currency(progress.spent)) }
                    " of "
                    (format_currency(progress.budget.amount))
                }
            }

            div
                class="w-full h-2.5 mt-2 bg-gray-200 rounded-full dark:bg-gray-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=(format!("{:.0}", progress.percent()))
            {
                div class={ "h-2.5 rounded-full " (bar_color) } style=(format!("width: {bar_width:.1}%")) {}
            }

            div class="flex justify-between items-center mt-2 text-sm text-gray-500 dark:text-gray-400"
            {
                span class="budget-remaining"
                {
                    @if remaining >= 0.0 {
                        (format_currency(remaining)) " left"
                    } @else {
                        (format_currency(-remaining)) " over"
                    }
                    " · " (status.label())
                }

                @if show_actions {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, progress.budget.id),
                            &endpoints::format_endpoint(endpoints::DELETE_BUDGET, progress.budget.id),
                            &format!(
                                "Are you sure you want to delete the budget for '{}'?",
                                progress.category_name
                            ),
                            "closest li",
                            "delete",
                        ))
                    }
                }
            }
        }
    )
}

fn status_attribute(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::UnderBudget => "under_budget",
        BudgetStatus::NearLimit => "near_limit",
        BudgetStatus::OverBudget => "over_budget",
    }
}
