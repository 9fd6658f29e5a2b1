//! Category editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        CategoryFormData, CategoryId,
        form::{CategoryFormValues, category_form_view},
        get_category, update_category,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base},
    navigation::NavBar,
};

/// The state needed for the edit category page and endpoint.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category editing page.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve category {category_id}: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);
    let values = CategoryFormValues {
        name: category.name.as_ref(),
        icon: &category.icon,
        color: &category.color,
    };

    Ok(edit_category_view(&edit_endpoint, &update_endpoint, &values).into_response())
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);

    let (name, icon, color) = match form.validate() {
        Ok(fields) => fields,
        Err(error) => {
            let values = CategoryFormValues {
                name: &form.name,
                icon: &form.icon,
                color: &form.color,
            };

            return category_form_view(
                FormAction::Update(&update_endpoint),
                &values,
                "Update Category",
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

    match update_category(category_id, name, &icon, &color, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_category_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    values: &CategoryFormValues<'_>,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = category_form_view(
        FormAction::Update(update_endpoint),
        values,
        "Update Category",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Category", &[], &content)
}

#[cfg(test)]
mod edit_category_tests {
    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error,
        category::{
            CategoryFormData, CategoryName, create_category, edit::EditCategoryState,
            get_category, get_edit_category_page, update_category_endpoint,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_hx_redirect,
            assert_valid_html, get_test_db_connection, must_get_form, parse_html_document,
            parse_html_fragment,
        },
    };

    fn get_state() -> EditCategoryState {
        EditCategoryState {
            db_connection: get_test_db_connection(),
        }
    }

    #[tokio::test]
    async fn get_edit_category_page_succeeds() {
        let state = get_state();
        let category = create_category(
            CategoryName::new_unchecked("Transport"),
            "🚌",
            "#123456",
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_edit_category_page(Path(category.id), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::PUT_CATEGORY, category.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Transport");
        assert_form_input_with_value(&form, "color", "color", "#123456");
        assert_form_submit_button_with_text(&form, "Update Category");
    }

    #[tokio::test]
    async fn get_edit_category_page_with_invalid_id_is_not_found() {
        let result = get_edit_category_page(Path(999), State(get_state())).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn update_category_endpoint_succeeds() {
        let state = get_state();
        let category = create_category(
            CategoryName::new_unchecked("Old"),
            "",
            "#000000",
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let form = CategoryFormData {
            name: "New".to_owned(),
            icon: "🆕".to_owned(),
            color: "#ffffff".to_owned(),
        };

        let response = update_category_endpoint(Path(category.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        let got = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.name.as_ref(), "New");
        assert_eq!(got.icon, "🆕");
    }

    #[tokio::test]
    async fn update_category_endpoint_with_invalid_id_returns_not_found() {
        let form = CategoryFormData {
            name: "New".to_owned(),
            icon: String::new(),
            color: "#ffffff".to_owned(),
        };

        let response = update_category_endpoint(Path(999), State(get_state()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_category_endpoint_with_empty_name_returns_error() {
        let form = CategoryFormData {
            name: String::new(),
            icon: String::new(),
            color: "#ffffff".to_owned(),
        };

        let response = update_category_endpoint(Path(1), State(get_state()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Category name cannot be empty");
    }
}
