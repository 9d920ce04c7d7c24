//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    alert::Alert,
    endpoints,
    internal_server_error::{BadGatewayError, InternalServerError},
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The backend rejected the email and password combination.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The session cookie is missing, or the backend rejected the access token.
    ///
    /// The client should be sent back to the log-in page.
    #[error("the session is missing or has expired")]
    Unauthorized,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error occurs when the backend responds with 404.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The HTTP client could not be created.
    #[error("could not build the HTTP client: {0}")]
    HttpClientError(String),

    /// The request to the backend failed before a response was received,
    /// e.g., the connection was refused or the request timed out.
    #[error("could not reach the backend: {0}")]
    BackendUnavailable(String),

    /// The backend responded with a non-success status code.
    #[error("the backend responded with status {0}")]
    BackendStatus(u16),

    /// The backend responded with a body that could not be parsed.
    #[error("unexpected response from the backend: {0}")]
    BackendResponse(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A submitted form failed validation.
    ///
    /// The string is the message to show the user.
    #[error("{0}")]
    InvalidForm(String),

    /// The uploaded file does not have an `image/*` content type.
    #[error("the uploaded file is not an image")]
    NotAnImage,

    /// The uploaded image is larger than the upload limit.
    #[error("the uploaded image is larger than {0} bytes")]
    ImageTooLarge(usize),

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The month the user navigated to has no report data.
    #[error("no report data for {month}/{year}")]
    NoReportData {
        /// The month that was requested, 1-12.
        month: u8,
        /// The year that was requested.
        year: i32,
    },

    /// The report view was closed or expired before the request arrived.
    #[error("the report view {0} does not exist")]
    ReportViewExpired(u64),

    /// Could not acquire the lock on the open report views.
    #[error("could not acquire the report views lock")]
    ReportViewsLockError,

    /// The CSV export could not be written.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// Tried to update a station that does not exist
    #[error("tried to update a station that does not exist")]
    UpdateMissingStation,

    /// Tried to delete a station that does not exist
    #[error("tried to delete a station that does not exist")]
    DeleteMissingStation,

    /// Tried to update a charger that does not exist
    #[error("tried to update a charger that does not exist")]
    UpdateMissingCharger,

    /// Tried to delete a charger that does not exist
    #[error("tried to delete a charger that does not exist")]
    DeleteMissingCharger,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::BackendResponse(value.to_string())
        } else if let Some(status) = value.status() {
            Error::BackendStatus(status.as_u16())
        } else {
            Error::BackendUnavailable(value.to_string())
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Unauthorized => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            error @ (Error::BackendUnavailable(_)
            | Error::BackendStatus(_)
            | Error::BackendResponse(_)) => {
                tracing::error!("Backend request failed: {error}");
                BadGatewayError.into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    ///
    /// [Error::Unauthorized] is the exception: it produces an `HX-Redirect`
    /// to the log-in page instead of an alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Unauthorized => {
                return (
                    HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                    StatusCode::UNAUTHORIZED,
                )
                    .into_response();
            }
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Alert::ErrorSimple {
                    message: "Incorrect email or password.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::InvalidForm(message) => (StatusCode::BAD_REQUEST, Alert::ErrorSimple { message }),
            Error::NotAnImage => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid image".to_owned(),
                    details: "Only image files can be uploaded.".to_owned(),
                },
            ),
            Error::ImageTooLarge(limit) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Alert::Error {
                    message: "Image too large".to_owned(),
                    details: format!("Images must be {} MB or smaller.", limit / 1024 / 1024),
                },
            ),
            Error::MultipartError(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the form".to_owned(),
                    details: error,
                },
            ),
            Error::NoReportData { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::ErrorSimple {
                    message: "No data for this month".to_owned(),
                },
            ),
            Error::ReportViewExpired(_) => (
                StatusCode::GONE,
                Alert::Error {
                    message: "This report has expired".to_owned(),
                    details: "Reload the page to continue browsing reports.".to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested item could not be found.".to_owned(),
                },
            ),
            Error::UpdateMissingStation => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update station".to_owned(),
                    details: "The station could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingStation => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete station".to_owned(),
                    details: "The station could not be found. \
                    Try refreshing the page to see if the station has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingCharger => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update charger".to_owned(),
                    details: "The charger could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingCharger => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete charger".to_owned(),
                    details: "The charger could not be found. \
                    Try refreshing the page to see if the charger has already been deleted."
                        .to_owned(),
                },
            ),
            Error::BackendUnavailable(error) => {
                tracing::error!("Backend request failed: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "Could not reach the EV station service".to_owned(),
                        details: "Check your connection and try again.".to_owned(),
                    },
                )
            }
            Error::BackendStatus(status) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "The EV station service rejected the request".to_owned(),
                    details: format!("The service responded with status {status}."),
                },
            ),
            Error::BackendResponse(error) => {
                tracing::error!("Unexpected backend response: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "Unexpected response from the EV station service".to_owned(),
                        details: "Try again later or check the server logs.".to_owned(),
                    },
                )
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }

    /// Map [Error::NotFound] to `missing`, leaving other errors untouched.
    ///
    /// Used by update and delete handlers to give the user a specific message.
    pub fn or_missing(self, missing: Error) -> Error {
        match self {
            Error::NotFound => missing,
            error => error,
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, get_header, parse_html_fragment},
    };

    use super::Error;

    #[tokio::test]
    async fn no_report_data_renders_alert() {
        let response = Error::NoReportData {
            month: 4,
            year: 2025,
        }
        .into_alert_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No data for this month"));
    }

    #[tokio::test]
    async fn unauthorized_alert_redirects_to_log_in() {
        let response = Error::Unauthorized.into_alert_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(get_header(&response, "hx-redirect"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn unauthorized_page_redirects_to_log_in() {
        let response = Error::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn backend_errors_render_bad_gateway() {
        let response = Error::BackendStatus(500).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn or_missing_only_replaces_not_found() {
        assert_eq!(
            Error::NotFound.or_missing(Error::DeleteMissingStation),
            Error::DeleteMissingStation
        );
        assert_eq!(
            Error::BackendStatus(500).or_missing(Error::DeleteMissingStation),
            Error::BackendStatus(500)
        );
    }
}
