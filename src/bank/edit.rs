//! Bank editing page and endpoint.

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
    bank::{
        BankFormData, BankId, NewBank,
        form::{BankFormValues, bank_form_view},
        get_bank, update_bank,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    navigation::NavBar,
};

/// The state needed for the edit bank page and endpoint.
#[derive(Debug, Clone)]
pub struct EditBankState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBankState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the bank editing page.
pub async fn get_edit_bank_page(
    Path(bank_id): Path<BankId>,
    State(state): State<EditBankState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let bank = get_bank(bank_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve bank {bank_id}: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_BANK_VIEW, bank_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_BANK, bank_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let values = BankFormValues {
        name: bank.name.as_ref(),
        color: &bank.color,
        logo_url: bank.logo_url.as_deref().unwrap_or_default(),
    };
    let form = bank_form_view(
        FormAction::Update(&update_endpoint),
        &values,
        "Update Bank",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    Ok(base("Edit Bank", &[], &content).into_response())
}

/// Handle bank update form submission.
pub async fn update_bank_endpoint(
    Path(bank_id): Path<BankId>,
    State(state): State<EditBankState>,
    Form(form): Form<BankFormData>,
) -> Response {
    let bank = match NewBank::try_from(&form) {
        Ok(bank) => bank,
        Err(error) => {
            let update_endpoint = endpoints::format_endpoint(endpoints::PUT_BANK, bank_id);
            let values = BankFormValues {
                name: &form.name,
                color: &form.color,
                logo_url: form.logo_url.as_deref().unwrap_or_default(),
            };

            return bank_form_view(
                FormAction::Update(&update_endpoint),
                &values,
                "Update Bank",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_bank(bank_id, bank, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::BANKS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update bank {bank_id}: {error}");
            error.into_alert_response()
        }
    }
}
