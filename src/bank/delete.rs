//! Bank deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    bank::{BankId, delete_bank},
};

/// The state needed for deleting a bank.
#[derive(Debug, Clone)]
pub struct DeleteBankEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBankEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle bank deletion. Returns success alert or error.
pub async fn delete_bank_endpoint(
    Path(bank_id): Path<BankId>,
    State(state): State<DeleteBankEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_bank(bank_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Bank deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete bank {bank_id}: {error}");
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
        bank::{BankName, NewBank, create_bank, delete_bank_endpoint},
        test_utils::{assert_alert_message, get_test_db_connection, parse_html_fragment},
    };

    use super::DeleteBankEndpointState;

    #[tokio::test]
    async fn delete_bank_endpoint_succeeds() {
        let state = DeleteBankEndpointState {
            db_connection: get_test_db_connection(),
        };
        let bank = create_bank(
            NewBank::new(BankName::new_unchecked("ASB")),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_bank_endpoint(Path(bank.id), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Bank deleted successfully");
    }

    #[tokio::test]
    async fn delete_missing_bank_returns_not_found() {
        let state = DeleteBankEndpointState {
            db_connection: get_test_db_connection(),
        };

        let response = delete_bank_endpoint(Path(7), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
