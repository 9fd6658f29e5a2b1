//! Alert system for displaying success and error messages to users.
//!
//! This module provides a unified way to display alert messages across the application
//! with proper styling and dismissal functionality.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// An alert message that is swapped into the page's alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with details on how to fix the error.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    /// Render the alert as an out-of-band swap for the `#alert-container` element.
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::Success { message, details } => (true, message, details),
            Alert::SuccessSimple { message } => (true, message, String::new()),
            Alert::Error { message, details } => (false, message, details),
            Alert::ErrorSimple { message } => (false, message, String::new()),
        };

        let style = if is_success {
            "flex items-start p-4 mb-4 text-sm rounded-lg shadow-lg \
            text-green-800 bg-green-50 border border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        } else {
            "flex items-start p-4 mb-4 text-sm rounded-lg shadow-lg \
            text-red-800 bg-red-50 border border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div role="alert" class=(style)
                {
                    div class="flex-1"
                    {
                        p class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-3 font-bold"
                        aria-label="Close"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::{
        alert::Alert,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    #[tokio::test]
    async fn renders_message_and_details() {
        let response = Alert::Success {
            message: "Saved".to_owned(),
            details: "All good".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("could not find alert")
            .text()
            .collect::<String>();
        assert!(text.contains("Saved"));
        assert!(text.contains("All good"));
    }

    #[tokio::test]
    async fn alert_swaps_out_of_band() {
        let html = Alert::ErrorSimple {
            message: "Oops".to_owned(),
        }
        .into_html()
        .into_string();

        assert!(html.contains("hx-swap-oob=\"true\""));
        assert!(html.contains("id=\"alert-container\""));
    }
}
