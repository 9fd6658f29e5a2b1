//! Account creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
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
        AccountForm, create_account,
        form::{AccountFormValues, account_form_view},
    },
    bank::get_all_banks,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles},
    navigation::NavBar,
};

/// The state needed for the create account page and endpoint.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for creating an account.
pub async fn get_new_account_page(
    State(state): State<CreateAccountState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let banks = get_all_banks(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve banks: {error}"))?;

    let nav_bar = NavBar::new(endpoints::NEW_ACCOUNT_VIEW).into_html();
    let form = account_form_view(
        FormAction::Create(endpoints::POST_ACCOUNT),
        &AccountFormValues::default(),
        &banks,
        "Create Account",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    Ok(base("Create Account", &[dollar_input_styles()], &content).into_response())
}

/// A route handler for creating a new account, redirects to the accounts view on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_account(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create account with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}
