//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    transaction::{TransactionId, delete_transaction},
};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction and reverting its effect on the balances.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<DeleteTransactionState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
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
        account::{AccountForm, AccountKind, create_account, get_account},
        test_utils::{assert_alert_message, get_test_db_connection, parse_html_fragment},
        transaction::{Transaction, create_transaction, delete_transaction_endpoint},
    };

    use super::DeleteTransactionState;

    #[tokio::test]
    async fn deletes_transaction_and_restores_balance() {
        let state = DeleteTransactionState {
            db_connection: get_test_db_connection(),
        };
        let (account_id, transaction_id) = {
            let connection = state.db_connection.lock().unwrap();
            let account = create_account(
                &AccountForm::new("Checking", AccountKind::Checking, 10.0),
                &connection,
            )
            .unwrap();
            let transaction = create_transaction(
                Transaction::build(4.0, date!(2025 - 02 - 03), "", account.id),
                &connection,
            )
            .unwrap();
            (account.id, transaction.id)
        };

        let response = delete_transaction_endpoint(Path(transaction_id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Transaction deleted successfully");
        let account = get_account(account_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(account.current_balance, 10.0);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = DeleteTransactionState {
            db_connection: get_test_db_connection(),
        };

        let response = delete_transaction_endpoint(Path(42), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Could not delete transaction");
    }
}
