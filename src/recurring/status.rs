//! Pausing and resuming recurring transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints,
    recurring::{RecurringId, RecurringStatus, toggle_recurring_status},
};

/// The state needed for pausing and resuming recurring transactions.
#[derive(Debug, Clone)]
pub struct RecurringStatusState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringStatusState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Pause an active recurring transaction or resume a paused one and respond
/// with the updated status button.
pub async fn toggle_recurring_status_endpoint(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<RecurringStatusState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match toggle_recurring_status(recurring_id, &connection) {
        Ok(status) => status_button(recurring_id, status).into_response(),
        Err(error) => {
            tracing::error!("Could not toggle status of recurring transaction {recurring_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// The badge that shows the status of a recurring transaction and toggles it when clicked.
pub(super) fn status_button(recurring_id: RecurringId, status: RecurringStatus) -> Markup {
    let endpoint = endpoints::format_endpoint(endpoints::TOGGLE_RECURRING_STATUS, recurring_id);
    let (label, color) = match status {
        RecurringStatus::Active => (
            "Pause",
            "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300",
        ),
        RecurringStatus::Paused => (
            "Resume",
            "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-300",
        ),
    };

    html!(
        button
            type="button"
            hx-post=(endpoint)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            title=(label)
            data-status=(status.as_str())
            class={ "px-2.5 py-0.5 text-xs font-semibold rounded-full cursor-pointer " (color) }
        {
            (status.label())
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        account::{AccountForm, AccountKind, create_account},
        recurring::{
            Frequency, RecurringForm, RecurringStatus, RecurringType,
            create_recurring_transaction, get_recurring_transaction,
            toggle_recurring_status_endpoint,
        },
        test_utils::{get_test_db_connection, parse_html_fragment},
    };

    use super::RecurringStatusState;

    #[tokio::test]
    async fn pauses_active_recurring_transaction() {
        let state = RecurringStatusState {
            db_connection: get_test_db_connection(),
        };
        {
            let connection = state.db_connection.lock().unwrap();
            let account = create_account(
                &AccountForm::new("Everyday", AccountKind::Checking, 0.0),
                &connection,
            )
            .unwrap();
            create_recurring_transaction(
                &RecurringForm {
                    description: "Music".to_owned(),
                    amount: 12.0,
                    recurring_type: RecurringType::Expense,
                    frequency: Frequency::Monthly,
                    start_date: date!(2025 - 01 - 01),
                    account_id: account.id,
                    category_id: None,
                },
                &connection,
            )
            .unwrap();
        }

        let response = toggle_recurring_status_endpoint(Path(1), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let button = html
            .select(&Selector::parse("button").unwrap())
            .next()
            .expect("No button found");
        assert_eq!(button.value().attr("data-status"), Some("paused"));
        assert_eq!(
            get_recurring_transaction(1, &state.db_connection.lock().unwrap())
                .unwrap()
                .status,
            RecurringStatus::Paused
        );
    }

    #[tokio::test]
    async fn missing_recurring_is_not_found() {
        let state = RecurringStatusState {
            db_connection: get_test_db_connection(),
        };

        let response = toggle_recurring_status_endpoint(Path(3), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
