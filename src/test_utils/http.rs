use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "unexpected status {}",
        response.status()
    );
}

/// The value of `header_name`, panicking if it is missing or not ASCII.
#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    match response.headers().get(header_name) {
        Some(value) => value
            .to_str()
            .unwrap_or_else(|error| panic!("Header {header_name} is not ASCII: {error}"))
            .to_owned(),
        None => panic!(
            "Response has no {header_name} header, got headers {:?}",
            response.headers()
        ),
    }
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let location = get_header(response, "hx-redirect");

    assert_eq!(location, endpoint, "htmx redirected to the wrong page");
}
