//! Bank creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    bank::{
        BankFormData, DEFAULT_BANK_COLOR, NewBank, create_bank,
        form::{BankFormValues, bank_form_view},
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    navigation::NavBar,
};

/// The state needed for creating a bank.
#[derive(Debug, Clone)]
pub struct CreateBankEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBankEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the bank creation page.
pub async fn get_new_bank_page() -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_BANK_VIEW).into_html();
    let values = BankFormValues {
        name: "",
        color: DEFAULT_BANK_COLOR,
        logo_url: "",
    };
    let form = bank_form_view(
        FormAction::Create(endpoints::POST_BANK),
        &values,
        "Create Bank",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Bank", &[], &content).into_response()
}

/// Handle bank creation form submission.
pub async fn create_bank_endpoint(
    State(state): State<CreateBankEndpointState>,
    Form(form): Form<BankFormData>,
) -> Response {
    let bank = match NewBank::try_from(&form) {
        Ok(bank) => bank,
        Err(error) => return invalid_form_view(&form, &error).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_bank(bank, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::BANKS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create bank: {error}");
            error.into_alert_response()
        }
    }
}

fn invalid_form_view(form: &BankFormData, error: &Error) -> Markup {
    let values = BankFormValues {
        name: &form.name,
        color: &form.color,
        logo_url: form.logo_url.as_deref().unwrap_or_default(),
    };

    bank_form_view(
        FormAction::Create(endpoints::POST_BANK),
        &values,
        "Create Bank",
        &format!("Error: {error}"),
    )
}
