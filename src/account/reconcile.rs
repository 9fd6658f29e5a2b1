//! Recomputing an account's balance from its transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, Reconciliation, reconcile_account},
    alert::Alert,
    html::format_currency,
};

/// The state needed for reconciling accounts.
#[derive(Debug, Clone)]
pub struct ReconcileAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReconcileAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Drift smaller than this is floating point noise.
const DRIFT_TOLERANCE: f64 = 0.005;

/// Reconcile an account and respond with an alert describing the drift.
///
/// The account's balance on the page is updated with an out-of-band swap.
pub async fn reconcile_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<ReconcileAccountState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let reconciliation = match reconcile_account(account_id, &connection) {
        Ok(reconciliation) => reconciliation,
        Err(error) => {
            tracing::error!("Could not reconcile account {account_id}: {error}");
            return error.into_alert_response();
        }
    };

    if reconciliation.drift().abs() >= DRIFT_TOLERANCE {
        tracing::warn!(
            "Account {account_id} had drifted by {} and was corrected",
            reconciliation.drift()
        );
    }

    let alert = reconciliation_alert(&reconciliation);

    html!(
        (alert.into_html())
        span id=(format!("account-balance-{account_id}")) hx-swap-oob="true"
        {
            (format_currency(reconciliation.expected_balance))
        }
    )
    .into_response()
}

fn reconciliation_alert(reconciliation: &Reconciliation) -> Alert {
    let drift = reconciliation.drift();

    if drift.abs() < DRIFT_TOLERANCE {
        Alert::Success {
            message: "Balance is correct".to_owned(),
            details: format!(
                "The balance of {} matches the recorded transactions.",
                format_currency(reconciliation.expected_balance)
            ),
        }
    } else {
        Alert::Success {
            message: "Balance corrected".to_owned(),
            details: format!(
                "The balance was {} but the recorded transactions add up to {} \
                (a drift of {}). The balance has been updated.",
                format_currency(reconciliation.previous_balance),
                format_currency(reconciliation.expected_balance),
                format_currency(drift)
            ),
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
        account::{AccountForm, AccountKind, create_account, reconcile_account_endpoint},
        test_utils::{assert_alert_message, get_test_db_connection, parse_html_fragment, select_texts},
    };

    use super::ReconcileAccountState;

    #[tokio::test]
    async fn reports_corrected_drift() {
        let state = ReconcileAccountState {
            db_connection: get_test_db_connection(),
        };
        let account = {
            let connection = state.db_connection.lock().unwrap();
            let account = create_account(
                &AccountForm::new("Everyday", AccountKind::Checking, 10.0),
                &connection,
            )
            .unwrap();
            connection
                .execute("UPDATE account SET current_balance = 12.5 WHERE id = ?1", [account.id])
                .unwrap();
            account
        };

        let response = reconcile_account_endpoint(Path(account.id), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Balance corrected");
        assert_eq!(
            select_texts(&html, &format!("#account-balance-{}", account.id)),
            ["$10.00"]
        );
    }

    #[tokio::test]
    async fn reports_no_drift() {
        let state = ReconcileAccountState {
            db_connection: get_test_db_connection(),
        };
        let account = create_account(
            &AccountForm::new("Everyday", AccountKind::Checking, 10.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = reconcile_account_endpoint(Path(account.id), State(state))
            .await
            .into_response();

        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Balance is correct");
    }
}
