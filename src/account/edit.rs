//! Account editing page and endpoint.

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
    account::{
        AccountForm, AccountId,
        form::{AccountFormValues, account_form_view},
        get_account, update_account,
    },
    bank::get_all_banks,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles},
    navigation::NavBar,
};

/// The state needed for the edit account page and endpoint.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing an account.
pub async fn get_edit_account_page(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve account {account_id}: {error}"))?;
    let banks = get_all_banks(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve banks: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ACCOUNT, account_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let values = AccountFormValues {
        name: &account.name,
        kind: account.kind,
        opening_balance: Some(account.opening_balance),
        bank_id: account.bank_id,
    };
    let form = account_form_view(
        FormAction::Update(&update_endpoint),
        &values,
        &banks,
        "Update Account",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            (form)
            p class="mt-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Changing the opening balance moves the current balance by the same amount."
            }
        }
    };

    Ok(base("Edit Account", &[dollar_input_styles()], &content).into_response())
}

/// A route handler for updating an account, redirects to the accounts view on success.
pub async fn update_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_account(account_id, &form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update account {account_id} with {form:?}: {error}");
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
    use axum_extra::extract::Form;

    use crate::{
        Error,
        account::{
            AccountForm, AccountKind, create_account, edit::EditAccountState, get_account,
            get_edit_account_page, update_account_endpoint,
        },
        endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_hx_redirect,
            assert_valid_html, get_test_db_connection, must_get_form, parse_html_document,
        },
    };

    fn get_state() -> EditAccountState {
        EditAccountState {
            db_connection: get_test_db_connection(),
        }
    }

    #[tokio::test]
    async fn render_page_with_account_values() {
        let state = get_state();
        let account = create_account(
            &AccountForm::new("Cash", AccountKind::Wallet, 20.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_edit_account_page(Path(account.id), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::PUT_ACCOUNT, account.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Cash");
        assert_form_input_with_value(&form, "opening_balance", "number", "20");
    }

    #[tokio::test]
    async fn missing_account_page_is_not_found() {
        let result = get_edit_account_page(Path(1), State(get_state())).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn update_account_endpoint_succeeds() {
        let state = get_state();
        let account = create_account(
            &AccountForm::new("Cash", AccountKind::Wallet, 20.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = update_account_endpoint(
            Path(account.id),
            State(state.clone()),
            Form(AccountForm::new("Pocket", AccountKind::Wallet, 25.0)),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ACCOUNTS_VIEW);
        let got = get_account(account.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.name, "Pocket");
        assert_eq!(got.current_balance, 25.0);
    }
}
