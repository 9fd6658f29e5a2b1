//! Defines the page and endpoint for editing a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::get_all_accounts,
    category::get_all_categories,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles},
    navigation::NavBar,
    recurring::{
        RecurringForm, RecurringId,
        form::{RecurringFormValues, recurring_form_view},
        get_recurring_transaction, update_recurring_transaction,
    },
};

/// The state needed for the edit recurring transaction page and endpoint.
#[derive(Debug, Clone)]
pub struct EditRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a recurring transaction.
pub async fn get_edit_recurring_page(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<EditRecurringState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let recurring = get_recurring_transaction(recurring_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve recurring transaction {recurring_id}: {error}")
    })?;
    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_RECURRING_VIEW, recurring_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_RECURRING, recurring_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let form = recurring_form_view(
        FormAction::Update(&update_endpoint),
        &RecurringFormValues::from_recurring(&recurring),
        &accounts,
        &categories,
        "Update Recurring Transaction",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            (form)
            p class="mt-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Next run: " (recurring.next_run_date)
                ". Changing the start date restarts the schedule from the new date."
            }
        }
    };

    Ok(base(
        "Edit Recurring Transaction",
        &[dollar_input_styles()],
        &content,
    )
    .into_response())
}

/// A route handler for updating a recurring transaction, redirects to the recurring view on success.
pub async fn update_recurring_endpoint(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<EditRecurringState>,
    Form(form): Form<RecurringForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_recurring_transaction(recurring_id, &form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::RECURRING_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "Could not update recurring transaction {recurring_id} with {form:?}: {error}"
            );
            error.into_alert_response()
        }
    }
}
