//! Budget creation page and endpoint.

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
    budget::{BudgetForm, create_budget, form::budget_form_view},
    category::get_all_categories,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles, link},
    navigation::NavBar,
};

/// The state needed for the create budget page and endpoint.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for creating a budget.
pub async fn get_new_budget_page(
    State(state): State<CreateBudgetState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let nav_bar = NavBar::new(endpoints::NEW_BUDGET_VIEW).into_html();
    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            @if categories.is_empty() {
                p
                {
                    "Budgets limit the spending in a category. "
                    (link(endpoints::NEW_CATEGORY_VIEW, "Create a category"))
                    " first."
                }
            } @else {
                (budget_form_view(
                    FormAction::Create(endpoints::POST_BUDGET),
                    None,
                    None,
                    &categories,
                    "Create Budget",
                ))
            }
        }
    };

    Ok(base("Create Budget", &[dollar_input_styles()], &content).into_response())
}

/// A route handler for creating a budget, redirects to the budgets view on success.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_budget(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create budget with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;

    use crate::{
        budget::{
            BudgetForm, create::CreateBudgetState, create_budget_endpoint, get_budget,
            get_new_budget_page,
        },
        category::{CategoryName, create_category},
        endpoints,
        test_utils::{
            assert_alert_message, assert_form_input, assert_form_select, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, get_test_db_connection, must_get_form,
            parse_html_document, parse_html_fragment,
        },
    };

    fn get_state() -> CreateBudgetState {
        let state = CreateBudgetState {
            db_connection: get_test_db_connection(),
        };
        create_category(
            CategoryName::new_unchecked("Groceries"),
            "🛒",
            "#22c55e",
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        state
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_new_budget_page(State(get_state())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_BUDGET, "hx-post");
        assert_form_select(&form, "category_id");
        assert_form_input(&form, "amount", "number");
    }

    #[tokio::test]
    async fn can_create_budget() {
        let state = get_state();
        let form = BudgetForm {
            category_id: 1,
            amount: 300.0,
        };

        let response = create_budget_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BUDGETS_VIEW);
        let budget = get_budget(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(budget.amount, 300.0);
    }

    #[tokio::test]
    async fn duplicate_budget_shows_alert() {
        let state = get_state();
        let form = BudgetForm {
            category_id: 1,
            amount: 300.0,
        };
        create_budget_endpoint(State(state.clone()), Form(form.clone())).await;

        let response = create_budget_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Duplicate Budget");
    }
}
