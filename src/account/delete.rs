//! Account deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, delete_account},
    alert::Alert,
};

/// The state needed for deleting an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account and its transactions.
pub async fn delete_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<DeleteAccountState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_account(account_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Account deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete account {account_id}: {error}");
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

    use crate::{
        account::{AccountForm, AccountKind, create_account, delete_account_endpoint},
        test_utils::{assert_alert_message, get_test_db_connection, parse_html_fragment},
    };

    use super::DeleteAccountState;

    #[tokio::test]
    async fn deletes_account() {
        let state = DeleteAccountState {
            db_connection: get_test_db_connection(),
        };
        let account = create_account(
            &AccountForm::new("Old", AccountKind::Other, 0.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_account_endpoint(Path(account.id), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_account_returns_not_found_alert() {
        let state = DeleteAccountState {
            db_connection: get_test_db_connection(),
        };

        let response = delete_account_endpoint(Path(12), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Could not delete account");
    }
}
