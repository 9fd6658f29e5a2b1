//! Defines the page and endpoint for editing an existing transaction.

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
    timezone::local_today,
    transaction::{
        TransactionId,
        form::{TransactionForm, TransactionFormValues, transaction_form_view},
        get_transaction, update_transaction,
    },
};

/// The state needed for the edit transaction page and endpoint.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for editing a transaction.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve transaction {transaction_id}: {error}")
    })?;
    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_TRANSACTION, transaction_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let form = transaction_form_view(
        FormAction::Update(&update_endpoint),
        &TransactionFormValues::from_transaction(&transaction, today),
        &accounts,
        &categories,
        "Update Transaction",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    Ok(base("Edit Transaction", &[dollar_input_styles()], &content).into_response())
}

/// A route handler for updating a transaction, redirects to the transactions view on success.
///
/// The account balances are corrected for the old and new amounts and accounts.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("could not get today's date: {error}");
            return error.into_alert_response();
        }
    };

    if form.date > today {
        tracing::error!("Tried to move transaction {transaction_id} to a future date: {form:?}");
        return Error::FutureDate(form.date).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(transaction_id, form.clone().into_builder(), &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}
