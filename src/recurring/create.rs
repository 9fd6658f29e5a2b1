//! Defines the page and endpoint for creating a recurring transaction.

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
    account::get_all_accounts,
    category::get_all_categories,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles, link},
    navigation::NavBar,
    recurring::{
        RecurringForm, create_recurring_transaction,
        form::{RecurringFormValues, recurring_form_view},
    },
    timezone::local_today,
};

/// The state needed to get or create a recurring transaction.
#[derive(Debug, Clone)]
pub struct CreateRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for creating a recurring transaction.
pub async fn get_new_recurring_page(
    State(state): State<CreateRecurringState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let mut values = RecurringFormValues::new(today);
    values.account_id = accounts.first().map(|account| account.id);

    let nav_bar = NavBar::new(endpoints::NEW_RECURRING_VIEW).into_html();
    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            @if accounts.is_empty() {
                p
                {
                    "Recurring transactions are paid from an account. "
                    (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
                    " first."
                }
            } @else {
                (recurring_form_view(
                    FormAction::Create(endpoints::POST_RECURRING),
                    &values,
                    &accounts,
                    &categories,
                    "Create Recurring Transaction",
                ))
            }
        }
    };

    Ok(base(
        "Create Recurring Transaction",
        &[dollar_input_styles()],
        &content,
    )
    .into_response())
}

/// A route handler for creating a recurring transaction, redirects to the recurring view on success.
///
/// The first transaction is generated when the start date is reached, not when
/// the recurring transaction is created.
pub async fn create_recurring_endpoint(
    State(state): State<CreateRecurringState>,
    Form(form): Form<RecurringForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_recurring_transaction(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::RECURRING_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create recurring transaction with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        account::{AccountForm, AccountKind, create_account},
        endpoints,
        recurring::{
            Frequency, RecurringForm, RecurringType, create::CreateRecurringState,
            create_recurring_endpoint, get_all_recurring_transactions, get_new_recurring_page,
        },
        test_utils::{
            assert_alert_message, assert_form_input, assert_form_select, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, get_test_db_connection, must_get_form,
            parse_html_document, parse_html_fragment,
        },
    };

    fn get_state() -> CreateRecurringState {
        CreateRecurringState {
            db_connection: get_test_db_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn create_test_account(state: &CreateRecurringState) -> i64 {
        create_account(
            &AccountForm::new("Everyday", AccountKind::Checking, 0.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
        .id
    }

    fn form(account_id: i64) -> RecurringForm {
        RecurringForm {
            description: "Rent".to_owned(),
            amount: 450.0,
            recurring_type: RecurringType::Expense,
            frequency: Frequency::Weekly,
            start_date: date!(2025 - 03 - 03),
            account_id,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn render_page() {
        let state = get_state();
        create_test_account(&state);

        let response = get_new_recurring_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_RECURRING, "hx-post");
        assert_form_input(&form, "recurring_type", "radio");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "start_date", "date");
        assert_form_select(&form, "frequency");
        assert_form_select(&form, "account_id");
        assert_form_select(&form, "category_id");
    }

    #[tokio::test]
    async fn can_create_recurring_transaction() {
        let state = get_state();
        let account_id = create_test_account(&state);

        let response = create_recurring_endpoint(State(state.clone()), Form(form(account_id)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::RECURRING_VIEW);
        let recurring =
            get_all_recurring_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(recurring.len(), 1);
        assert_eq!(recurring[0].description, "Rent");
    }

    #[tokio::test]
    async fn rejects_blank_description() {
        let state = get_state();
        let account_id = create_test_account(&state);
        let mut form = form(account_id);
        form.description = " ".to_owned();

        let response = create_recurring_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Invalid form");
    }
}
