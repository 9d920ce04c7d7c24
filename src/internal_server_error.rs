//! The page to display for an internal server error or an unreachable backend.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl InternalServerError<'_> {
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", self.description, self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

/// The page shown when the EV station service cannot be reached or
/// returns something unexpected.
pub struct BadGatewayError;

impl IntoResponse for BadGatewayError {
    fn into_response(self) -> Response {
        let page = error_view(
            "Service Unavailable",
            "502",
            "The EV station service is not responding.",
            "Wait a moment and reload the page.",
        );

        (StatusCode::BAD_GATEWAY, Html(page.into_string())).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

#[cfg(test)]
mod internal_server_error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::{BadGatewayError, get_internal_server_error_page};

    #[tokio::test]
    async fn error_page_is_valid_html() {
        let response = get_internal_server_error_page().await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }

    #[tokio::test]
    async fn bad_gateway_page_has_502_status() {
        let response = BadGatewayError.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
