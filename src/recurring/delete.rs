//! Defines the endpoint for deleting a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    recurring::{RecurringId, delete_recurring_transaction},
};

/// The state needed for deleting a recurring transaction.
#[derive(Debug, Clone)]
pub struct DeleteRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a recurring transaction.
///
/// Transactions it already generated are kept.
pub async fn delete_recurring_endpoint(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<DeleteRecurringState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_recurring_transaction(recurring_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Recurring transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete recurring transaction {recurring_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        account::{AccountForm, AccountKind, create_account},
        recurring::{
            Frequency, RecurringForm, RecurringType, create_recurring_transaction,
            delete_recurring_endpoint, get_all_recurring_transactions, process_due_recurring,
        },
        test_utils::{assert_alert_message, get_test_db_connection, parse_html_fragment},
        transaction::get_transaction,
    };

    use super::DeleteRecurringState;

    #[tokio::test]
    async fn deletes_recurring_and_keeps_generated_transactions() {
        let state = DeleteRecurringState {
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
                    description: "Internet".to_owned(),
                    amount: 80.0,
                    recurring_type: RecurringType::Expense,
                    frequency: Frequency::Monthly,
                    start_date: date!(2025 - 01 - 01),
                    account_id: account.id,
                    category_id: None,
                },
                &connection,
            )
            .unwrap();
            process_due_recurring(date!(2025 - 01 - 01), &connection).unwrap();
        }

        let response = delete_recurring_endpoint(Path(1), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Recurring transaction deleted successfully");
        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_recurring_transactions(&connection).unwrap().is_empty());
        assert_eq!(get_transaction(1, &connection).unwrap().recurring_id, None);
    }

    #[tokio::test]
    async fn missing_recurring_is_not_found() {
        let state = DeleteRecurringState {
            db_connection: get_test_db_connection(),
        };

        let response = delete_recurring_endpoint(Path(7), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Could not delete recurring transaction");
    }
}
