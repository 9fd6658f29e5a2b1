//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    category::{CategoryId, delete_category},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category deletion. Returns success alert or error.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Category deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error,
        category::{CategoryName, create_category, delete_category_endpoint, get_category},
        test_utils::{
            assert_alert_message, assert_valid_html, get_test_db_connection, parse_html_fragment,
        },
    };

    use super::DeleteCategoryEndpointState;

    fn get_state() -> DeleteCategoryEndpointState {
        DeleteCategoryEndpointState {
            db_connection: get_test_db_connection(),
        }
    }

    #[tokio::test]
    async fn delete_category_endpoint_succeeds() {
        let state = get_state();
        let category = create_category(
            CategoryName::new_unchecked("Test"),
            "",
            "#000000",
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_category_endpoint(Path(category.id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_category(category.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_category_endpoint_with_invalid_id_returns_error_html() {
        let response = delete_category_endpoint(Path(999), State(get_state()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_alert_message(&html, "Could not delete category");
    }
}
