//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, get_accounts_page,
        get_edit_account_page, get_new_account_page, reconcile_account_endpoint,
        toggle_favorite_account_endpoint, update_account_endpoint,
    },
    bank::{
        create_bank_endpoint, delete_bank_endpoint, get_banks_page, get_edit_bank_page,
        get_new_bank_page, update_bank_endpoint,
    },
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budgets_page, get_edit_budget_page,
        get_new_budget_page, update_budget_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    dashboard::{get_dashboard_page, get_prediction},
    endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
    import::{get_import_page, import_transactions_endpoint, upload_import_file},
    recurring::{
        create_recurring_endpoint, delete_recurring_endpoint, get_edit_recurring_page,
        get_new_recurring_page, get_recurring_page, run_due_recurring_endpoint,
        toggle_recurring_status_endpoint, update_recurring_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::IMPORT_VIEW, get(get_import_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_new_account_page))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_account_page))
        .route(endpoints::BANKS_VIEW, get(get_banks_page))
        .route(endpoints::NEW_BANK_VIEW, get(get_new_bank_page))
        .route(endpoints::EDIT_BANK_VIEW, get(get_edit_bank_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::RECURRING_VIEW, get(get_recurring_page))
        .route(endpoints::NEW_RECURRING_VIEW, get(get_new_recurring_page))
        .route(endpoints::EDIT_RECURRING_VIEW, get(get_edit_recurring_page))
        .route(endpoints::BUDGETS_VIEW, get(get_budgets_page))
        .route(endpoints::NEW_BUDGET_VIEW, get(get_new_budget_page))
        .route(endpoints::EDIT_BUDGET_VIEW, get(get_edit_budget_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::POST_TRANSACTION, post(create_transaction_endpoint))
        .route(endpoints::PUT_TRANSACTION, put(update_transaction_endpoint))
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::IMPORT_UPLOAD, post(upload_import_file))
        .route(endpoints::IMPORT, post(import_transactions_endpoint))
        .route(endpoints::POST_ACCOUNT, post(create_account_endpoint))
        .route(endpoints::PUT_ACCOUNT, put(update_account_endpoint))
        .route(endpoints::DELETE_ACCOUNT, delete(delete_account_endpoint))
        .route(
            endpoints::TOGGLE_FAVORITE_ACCOUNT,
            post(toggle_favorite_account_endpoint),
        )
        .route(
            endpoints::RECONCILE_ACCOUNT,
            post(reconcile_account_endpoint),
        )
        .route(endpoints::POST_BANK, post(create_bank_endpoint))
        .route(endpoints::PUT_BANK, put(update_bank_endpoint))
        .route(endpoints::DELETE_BANK, delete(delete_bank_endpoint))
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
        .route(endpoints::PUT_CATEGORY, put(update_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
        .route(endpoints::POST_RECURRING, post(create_recurring_endpoint))
        .route(endpoints::PUT_RECURRING, put(update_recurring_endpoint))
        .route(endpoints::DELETE_RECURRING, delete(delete_recurring_endpoint))
        .route(
            endpoints::TOGGLE_RECURRING_STATUS,
            post(toggle_recurring_status_endpoint),
        )
        .route(
            endpoints::RUN_DUE_RECURRING,
            post(run_due_recurring_endpoint),
        )
        .route(endpoints::POST_BUDGET, post(create_budget_endpoint))
        .route(endpoints::PUT_BUDGET, put(update_budget_endpoint))
        .route(endpoints::DELETE_BUDGET, delete(delete_budget_endpoint))
        .route(endpoints::PREDICTION, get(get_prediction));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use scraper::Html;
    use time::OffsetDateTime;

    use crate::{
        AppState, PaginationConfig, build_router, endpoints,
        account::{AccountForm, AccountKind, create_account, get_account},
        test_utils::{get_test_connection, select_texts},
    };

    fn get_test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            get_test_connection(),
            "Etc/UTC",
            PaginationConfig::default(),
        )
        .unwrap();
        let server = TestServer::new(build_router(state.clone()));

        (server, state)
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let (server, _) = get_test_server();

        server
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (server, _) = get_test_server();

        server
            .get("/definitely/not/a/page")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn every_page_renders() {
        let (server, _) = get_test_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::IMPORT_VIEW,
            endpoints::ACCOUNTS_VIEW,
            endpoints::NEW_ACCOUNT_VIEW,
            endpoints::BANKS_VIEW,
            endpoints::NEW_BANK_VIEW,
            endpoints::CATEGORIES_VIEW,
            endpoints::NEW_CATEGORY_VIEW,
            endpoints::RECURRING_VIEW,
            endpoints::NEW_RECURRING_VIEW,
            endpoints::BUDGETS_VIEW,
            endpoints::NEW_BUDGET_VIEW,
        ] {
            let response = server.get(page).await;
            assert_eq!(response.status_code(), StatusCode::OK, "page {page}");
        }
    }

    #[tokio::test]
    async fn upload_then_import_statement() {
        let (server, state) = get_test_server();
        let account_id = create_account(
            &AccountForm::new("Everyday", AccountKind::Checking, 0.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
        .id;
        let today = OffsetDateTime::now_utc().date();
        let statement = format!("Date,Description,Amount\n{today},Coffee,-4.50\n{today},Pay,100\n");

        let upload = server
            .post(endpoints::IMPORT_UPLOAD)
            .multipart(MultipartForm::new().add_part(
                "file",
                Part::text(statement)
                    .file_name("statement.csv")
                    .mime_type("text/csv"),
            ))
            .await;

        upload.assert_status_ok();
        let html = Html::parse_fragment(&upload.text());
        assert_eq!(select_texts(&html, "tr[data-preview-row]").len(), 2);

        let csv_data = html
            .select(&scraper::Selector::parse("input[name=csv_data]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .expect("No csv_data input")
            .to_owned();

        let account_id_string = account_id.to_string();
        server
            .post(endpoints::IMPORT)
            .form(&[
                ("account_id", account_id_string.as_str()),
                ("csv_data", csv_data.as_str()),
                ("date_column", "0"),
                ("date_format", "year_month_day"),
                ("description_column", "1"),
                ("amount_column", "2"),
                ("debit_column", ""),
                ("credit_column", ""),
            ])
            .await
            .assert_status(StatusCode::CREATED);

        let balance = get_account(account_id, &state.db_connection.lock().unwrap())
            .unwrap()
            .current_balance;
        assert_eq!(balance, 95.5);
    }

    #[tokio::test]
    async fn upload_rejects_other_file_types() {
        let (server, _) = get_test_server();

        server
            .post(endpoints::IMPORT_UPLOAD)
            .multipart(MultipartForm::new().add_part(
                "file",
                Part::bytes(vec![0, 1, 2])
                    .file_name("statement.pdf")
                    .mime_type("application/pdf"),
            ))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn prediction_is_json() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::PREDICTION).await;

        response.assert_status_ok();
        let json: serde_json::Value = response.json();
        assert_eq!(json["months_considered"], 0);
    }
}
