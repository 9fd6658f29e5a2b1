//! Marking accounts as favorites.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, toggle_favorite_account},
    endpoints,
};

/// The state needed for toggling favorite accounts.
#[derive(Debug, Clone)]
pub struct FavoriteAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FavoriteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Flip the favorite flag of an account and respond with the updated star button.
pub async fn toggle_favorite_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<FavoriteAccountState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match toggle_favorite_account(account_id, &connection) {
        Ok(is_favorite) => favorite_button(account_id, is_favorite).into_response(),
        Err(error) => {
            tracing::error!("Could not toggle favorite for account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// The star button that toggles whether an account is a favorite.
pub(super) fn favorite_button(account_id: AccountId, is_favorite: bool) -> Markup {
    let endpoint = endpoints::format_endpoint(endpoints::TOGGLE_FAVORITE_ACCOUNT, account_id);
    let (icon, label, style) = if is_favorite {
        ("★", "Remove from favorites", "text-yellow-400")
    } else {
        ("☆", "Add to favorites", "text-gray-400 hover:text-yellow-400")
    };

    html!(
        button
            type="button"
            hx-post=(endpoint)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            aria-label=(label)
            aria-pressed=(is_favorite)
            class={"text-xl bg-transparent border-none cursor-pointer " (style)}
        {
            (icon)
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        account::{AccountForm, AccountKind, create_account, toggle_favorite_account_endpoint},
        test_utils::{get_test_db_connection, parse_html_fragment},
    };

    use super::FavoriteAccountState;

    #[tokio::test]
    async fn returns_pressed_button() {
        let state = FavoriteAccountState {
            db_connection: get_test_db_connection(),
        };
        let account = create_account(
            &AccountForm::new("Everyday", AccountKind::Checking, 0.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = toggle_favorite_account_endpoint(Path(account.id), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let button = html
            .select(&scraper::Selector::parse("button").unwrap())
            .next()
            .expect("No button found");
        assert_eq!(button.value().attr("aria-pressed"), Some("true"));
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let state = FavoriteAccountState {
            db_connection: get_test_db_connection(),
        };

        let response = toggle_favorite_account_endpoint(Path(9), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
