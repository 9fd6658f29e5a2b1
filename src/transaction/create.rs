//! Defines the page and endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::get_all_accounts,
    category::get_all_categories,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles, link},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        create_transaction,
        form::{TransactionForm, TransactionFormValues, transaction_form_view},
    },
};

/// The state needed to get or create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for recording a new income, expense or transfer.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionState>,
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

    let mut values = TransactionFormValues::new(today);
    values.account_id = accounts.first().map(|account| account.id);

    let form = if accounts.is_empty() {
        no_accounts_view()
    } else {
        transaction_form_view(
            FormAction::Create(endpoints::POST_TRANSACTION),
            &values,
            &accounts,
            &categories,
            "Create Transaction",
        )
    };

    Ok(new_transaction_view(form).into_response())
}

fn new_transaction_view(form: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Transaction", &[dollar_input_styles()], &content)
}

fn no_accounts_view() -> Markup {
    html! {
        p
        {
            "Transactions belong to an account. "
            (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
            " first."
        }
    }
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("could not get today's date: {error}");
            return error.into_alert_response();
        }
    };

    if form.date > today {
        tracing::error!("Tried to create a transaction dated in the future: {form:?}");
        return Error::FutureDate(form.date).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(form.clone().into_builder(), &connection) {
        tracing::error!("could not create transaction from {form:?}: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use time::{Duration, OffsetDateTime};

    use crate::{
        account::{AccountForm, AccountKind, create_account, get_account},
        endpoints,
        test_utils::{
            assert_alert_message, assert_form_input, assert_form_select, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, get_test_db_connection, must_get_form,
            parse_html_document, parse_html_fragment,
        },
        transaction::{
            TransactionType, create::CreateTransactionState, create_transaction_endpoint,
            form::TransactionForm, get_new_transaction_page, get_transaction,
        },
    };

    fn get_state() -> CreateTransactionState {
        CreateTransactionState {
            db_connection: get_test_db_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn create_test_account(state: &CreateTransactionState, name: &str) -> i64 {
        create_account(
            &AccountForm::new(name, AccountKind::Checking, 100.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
        .id
    }

    fn form(account_id: i64) -> TransactionForm {
        TransactionForm {
            transaction_type: TransactionType::Expense,
            amount: 12.3,
            date: OffsetDateTime::now_utc().date(),
            description: "test transaction".to_owned(),
            account_id,
            category_id: None,
            related_account_id: None,
        }
    }

    #[tokio::test]
    async fn render_page() {
        let state = get_state();
        create_test_account(&state, "Everyday");

        let response = get_new_transaction_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_TRANSACTION, "hx-post");
        assert_form_input(&form, "transaction_type", "radio");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_select(&form, "account_id");
        assert_form_select(&form, "category_id");
        assert_form_select(&form, "related_account_id");
    }

    #[tokio::test]
    async fn page_without_accounts_links_to_new_account() {
        let response = get_new_transaction_page(State(get_state())).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let selector = scraper::Selector::parse("form").unwrap();
        assert!(html.select(&selector).next().is_none());
        let link = scraper::Selector::parse(&format!("a[href=\"{}\"]", endpoints::NEW_ACCOUNT_VIEW))
            .unwrap();
        assert!(html.select(&link).next().is_some());
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_state();
        let account_id = create_test_account(&state, "Everyday");

        let response = create_transaction_endpoint(State(state.clone()), Form(form(account_id)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.description, "test transaction");
        assert_eq!(
            get_account(account_id, &connection).unwrap().current_balance,
            100.0 - 12.3
        );
    }

    #[tokio::test]
    async fn rejects_future_date() {
        let state = get_state();
        let account_id = create_test_account(&state, "Everyday");
        let mut form = form(account_id);
        form.date = OffsetDateTime::now_utc().date() + Duration::days(2);

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Invalid transaction date");
        assert!(get_transaction(1, &state.db_connection.lock().unwrap()).is_err());
    }

    #[tokio::test]
    async fn rejects_transfer_to_same_account() {
        let state = get_state();
        let account_id = create_test_account(&state, "Everyday");
        let mut form = form(account_id);
        form.transaction_type = TransactionType::Transfer;
        form.related_account_id = Some(account_id);

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Invalid transfer");
    }
}
