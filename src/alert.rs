//! Alert partials for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments. Error responses are swapped into
//! `#alert-container` by the htmx response-targets extension, while success
//! alerts that accompany other content use an out-of-band swap
//! (see [Alert::into_oob_html]).

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// The ID of the element in the base layout that alerts are swapped into.
pub const ALERT_CONTAINER_ID: &str = "alert-container";

/// A message to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message.
    SuccessSimple { message: String },
    /// An error message with details on what went wrong and how to fix it.
    Error { message: String, details: String },
    /// An error message.
    ErrorSimple { message: String },
}

impl Alert {
    fn is_success(&self) -> bool {
        matches!(self, Alert::Success { .. } | Alert::SuccessSimple { .. })
    }

    fn message_and_details(&self) -> (&str, Option<&str>) {
        match self {
            Alert::Success { message, details } | Alert::Error { message, details } => {
                (message.as_str(), Some(details.as_str()))
            }
            Alert::SuccessSimple { message } | Alert::ErrorSimple { message } => {
                (message.as_str(), None)
            }
        }
    }

    /// Render the alert as an HTML fragment.
    ///
    /// The message is always the first paragraph in the fragment.
    pub fn into_html(self) -> Markup {
        let container_style = if self.is_success() {
            "flex items-start justify-between gap-4 p-4 mb-4 text-sm rounded-lg \
            border border-green-300 text-green-800 bg-green-50 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        } else {
            "flex items-start justify-between gap-4 p-4 mb-4 text-sm rounded-lg \
            border border-red-300 text-red-800 bg-red-50 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        };
        let (message, details) = self.message_and_details();

        html! {
            div class=(container_style) role="alert"
            {
                div
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details {
                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }
                }

                button
                    type="button"
                    class="font-bold leading-none"
                    aria-label="Dismiss"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert wrapped in an out-of-band swap targeting the alert
    /// container, so it can be sent alongside the main response content.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id=(ALERT_CONTAINER_ID) hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::{ALERT_CONTAINER_ID, Alert};

    #[tokio::test]
    async fn renders_message_in_first_paragraph() {
        let response = Alert::Error {
            message: "Could not delete station".to_owned(),
            details: "The station could not be found.".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let paragraphs = html
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(
            paragraphs,
            ["Could not delete station", "The station could not be found."]
        );
    }

    #[tokio::test]
    async fn simple_alert_has_no_details() {
        let response = Alert::SuccessSimple {
            message: "Station deleted".to_owned(),
        }
        .into_response();

        let html = parse_html_fragment(response).await;
        let paragraph_count = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraph_count, 1);
    }

    #[test]
    fn oob_alert_targets_alert_container() {
        let markup = Alert::SuccessSimple {
            message: "Saved".to_owned(),
        }
        .into_oob_html()
        .into_string();

        assert!(markup.contains(&format!("id=\"{ALERT_CONTAINER_ID}\"")));
        assert!(markup.contains("hx-swap-oob=\"innerHTML\""));
    }
}
