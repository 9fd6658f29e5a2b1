//! Defines the endpoint for generating the transactions of due recurring transactions on demand.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, recurring::process_due_recurring, timezone::local_today,
};

/// The state needed for running the due recurring transactions.
#[derive(Debug, Clone)]
pub struct RunDueRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for RunDueRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that generates every due transaction up to today and
/// responds with an alert summarising what was created.
pub async fn run_due_recurring_endpoint(State(state): State<RunDueRecurringState>) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("could not get today's date: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match process_due_recurring(today, &connection) {
        Ok(result) if result.transactions_created == 0 => Alert::SuccessSimple {
            message: "No recurring transactions are due".to_owned(),
        }
        .into_response(),
        Ok(result) => Alert::Success {
            message: format!("Created {} transactions", result.transactions_created),
            details: format!(
                "Processed {} recurring transactions. Refresh the page to see the new run dates.",
                result.templates_processed
            ),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not process due recurring transactions: {error}");
            error.into_alert_response()
        }
    }
}
