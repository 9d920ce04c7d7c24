//! Helpers for redirect URLs during authentication flows.
//!
//! After logging in the user is sent back to the page they originally asked
//! for. Only same-origin, absolute paths are accepted as redirect targets.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map_or(redirect_url, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && !path.starts_with("/api/")
}

/// Reduce `raw_url` to its path and query, rejecting URLs that point to
/// another origin, the log-in page, or an API route.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Like [normalize_redirect_url], but the full URL sent by htmx in the
/// `HX-Current-URL` header is expected to include an origin.
fn normalize_hx_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the log-in page URL that sends the user back to the page that
/// `request` came from.
///
/// Page requests redirect back to themselves. htmx requests to `/api` routes
/// redirect back to the page that issued them.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)?
    } else {
        let path_and_query = request.uri().path_and_query()?.as_str();
        normalize_redirect_url(path_and_query)?
    };

    build_log_in_redirect_url_from_target(&redirect_target)
}

pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", redirect_target)])
        .inspect_err(|error| {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}")
        })
        .ok()
        .map(|param| format!("{}?{}", endpoints::LOG_IN_VIEW, param))
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let redirect_url = normalize_hx_current_url(current_url);
    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}

#[cfg(test)]
mod redirect_tests {
    use axum::{body::Body, extract::Request};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn keeps_local_paths_with_query() {
        assert_eq!(
            normalize_redirect_url("/chargers?station_id=abc"),
            Some("/chargers?station_id=abc".to_owned())
        );
    }

    #[test]
    fn rejects_unsafe_targets() {
        for url in [
            "https://evil.example.com/stations",
            "//evil.example.com",
            "stations",
            endpoints::LOG_IN_VIEW,
            "/api/stations",
        ] {
            assert_eq!(normalize_redirect_url(url), None, "{url} should be rejected");
        }
    }

    #[test]
    fn page_request_redirects_back_to_itself() {
        let request = Request::builder()
            .uri("/reports")
            .body(Body::empty())
            .unwrap();

        let got = build_log_in_redirect_url(&request);

        assert_eq!(got, Some("/log_in?redirect_url=%2Freports".to_owned()));
    }

    #[test]
    fn hx_request_redirects_back_to_current_page() {
        let request = Request::builder()
            .uri("/api/stations/abc")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "https://admin.example.com/stations")
            .body(Body::empty())
            .unwrap();

        let got = build_log_in_redirect_url(&request);

        assert_eq!(got, Some("/log_in?redirect_url=%2Fstations".to_owned()));
    }

    #[test]
    fn api_request_without_htmx_headers_has_no_target() {
        let request = Request::builder()
            .uri("/api/stations/abc")
            .body(Body::empty())
            .unwrap();

        assert_eq!(build_log_in_redirect_url(&request), None);
    }
}
