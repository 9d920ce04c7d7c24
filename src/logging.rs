//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        HeaderMap, StatusCode,
        header::CONTENT_TYPE,
        request::Parts as RequestParts,
        response::Parts as ResponseParts,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of characters of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The form fields whose values never reach the logs.
const REDACTED_FIELDS: [&str; 1] = ["password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Multipart bodies (image uploads) are passed through without being read.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    if is_multipart(request.headers()) {
        tracing::info!(
            "Received request: {} {}\nbody: <multipart>",
            request.method(),
            request.uri()
        );
        let response = next.run(request).await;
        return log_and_rebuild_response(response).await;
    }

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body_bytes);
    if is_url_encoded_form(&parts.headers) {
        let redacted = REDACTED_FIELDS
            .iter()
            .fold(body_text.into_owned(), |text, field| {
                redact_field(&text, field)
            });
        log_request(&parts, &redacted);
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    log_and_rebuild_response(response).await
}

async fn log_and_rebuild_response(response: Response) -> Response {
    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn content_type_starts_with(headers: &HeaderMap, prefix: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(prefix))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    content_type_starts_with(headers, "multipart/form-data")
}

fn is_url_encoded_form(headers: &HeaderMap) -> bool {
    content_type_starts_with(headers, "application/x-www-form-urlencoded")
}

/// Replace the value of every `field_name=` pair in a URL encoded form.
fn redact_field(form_text: &str, field_name: &str) -> String {
    let prefix = format!("{field_name}=");

    form_text
        .split('&')
        .map(|pair| {
            if pair.starts_with(&prefix) {
                format!("{prefix}********")
            } else {
                pair.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if
/// the body is short enough to log in full.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(parts: &RequestParts, body: &str) {
    match truncate(body) {
        Some(head) => {
            tracing::info!("Received request: {parts:#?}\nbody: {head}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &ResponseParts, body: &Bytes) {
    let body = String::from_utf8_lossy(body);

    match truncate(&body) {
        Some(head) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {head}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::http::{HeaderMap, HeaderValue, header::CONTENT_TYPE};

    use super::{LOG_BODY_LENGTH_LIMIT, is_multipart, redact_field, truncate};

    #[test]
    fn redacts_password_only() {
        let redacted = redact_field("email=admin%40example.com&password=hunter2&remember_me=on", "password");

        assert_eq!(redacted, "email=admin%40example.com&password=********&remember_me=on");
    }

    #[test]
    fn redact_leaves_form_without_field_unchanged() {
        assert_eq!(redact_field("name=Tan+Dinh", "password"), "name=Tan+Dinh");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let body = "ạ".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        let head = truncate(&body).unwrap();

        assert_eq!(head.chars().count(), LOG_BODY_LENGTH_LIMIT);
        assert_eq!(truncate("short"), None);
    }

    #[test]
    fn detects_multipart() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=abc"),
        );

        assert!(is_multipart(&headers));
        assert!(!is_multipart(&HeaderMap::new()));
    }
}
