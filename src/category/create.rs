//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        CategoryFormData, DEFAULT_CATEGORY_COLOR, create_category,
        form::{CategoryFormValues, category_form_view},
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    navigation::NavBar,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page() -> Response {
    new_category_view().into_response()
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let (name, icon, color) = match form.validate() {
        Ok(fields) => fields,
        Err(error) => {
            let values = CategoryFormValues {
                name: &form.name,
                icon: &form.icon,
                color: &form.color,
            };

            return category_form_view(
                FormAction::Create(endpoints::POST_CATEGORY),
                &values,
                "Create Category",
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

    match create_category(name, &icon, &color, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create category: {error}");
            error.into_alert_response()
        }
    }
}

fn new_category_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();
    let values = CategoryFormValues {
        name: "",
        icon: "",
        color: DEFAULT_CATEGORY_COLOR,
    };
    let form = category_form_view(
        FormAction::Create(endpoints::POST_CATEGORY),
        &values,
        "Create Category",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Category", &[], &content)
}

#[cfg(test)]
mod new_category_page_tests {
    use axum::http::StatusCode;

    use crate::{
        category::get_new_category_page,
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_new_category_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_CATEGORY, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "color", "color");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        category::{
            CategoryFormData, create::CreateCategoryEndpointState, create_category_endpoint,
            get_category,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html,
            get_test_db_connection, must_get_form, parse_html_fragment,
        },
    };

    fn get_state() -> CreateCategoryEndpointState {
        CreateCategoryEndpointState {
            db_connection: get_test_db_connection(),
        }
    }

    fn form(name: &str, color: &str) -> CategoryFormData {
        CategoryFormData {
            name: name.to_owned(),
            icon: "🍕".to_owned(),
            color: color.to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_category() {
        let state = get_state();

        let response = create_category_endpoint(State(state.clone()), Form(form("Food", "#FF0000")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        let category = get_category(1, &state.db_connection.lock().unwrap())
            .expect("Could not get category");
        assert_eq!(category.name.as_ref(), "Food");
        assert_eq!(category.color, "#ff0000");
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let response = create_category_endpoint(State(get_state()), Form(form(" ", "#ff0000")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Category name cannot be empty");
    }

    #[tokio::test]
    async fn create_category_fails_on_duplicate_name() {
        let state = get_state();
        create_category_endpoint(State(state.clone()), Form(form("Food", "#ff0000"))).await;

        let response = create_category_endpoint(State(state), Form(form("Food", "#00ff00")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
