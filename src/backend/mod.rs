//! The HTTP client for the EV station backend REST API.
//!
//! Every backend response is wrapped in an envelope of the form
//! `{ "data": T, ... }`. [BackendClient] unwraps the envelope and maps
//! transport failures and error statuses onto [Error].

mod lenient;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, header::COOKIE};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, auth::AccessToken};

pub(crate) use lenient::{optional_number, string_or_number};

/// The name of the cookie the backend reads the access token from.
const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Serialize)]
struct LogInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// A client for the backend REST API.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`, e.g.
    /// "https://example.com/evstation/api".
    ///
    /// Requests that take longer than `timeout` fail with [Error::BackendUnavailable].
    ///
    /// # Errors
    /// Returns [Error::HttpClientError] if the HTTP client cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::HttpClientError(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request to `path` that carries the session's access token.
    pub(crate) fn request(&self, method: Method, path: &str, token: &AccessToken) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(COOKIE, format!("{ACCESS_TOKEN_COOKIE}={}", token.as_str()))
    }

    /// Send `request` and return the `data` field of the response envelope.
    ///
    /// # Errors
    /// - [Error::BackendUnavailable] if no response was received.
    /// - [Error::Unauthorized] if the backend responds with 401 or 403.
    /// - [Error::NotFound] if the backend responds with 404.
    /// - [Error::BackendStatus] for any other non-success status.
    /// - [Error::BackendResponse] if the body is not JSON of the expected
    ///   shape or the `data` field is missing.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let body = self.send_for_text(request).await?;

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|error| Error::BackendResponse(error.to_string()))?;

        envelope
            .data
            .ok_or_else(|| Error::BackendResponse("response is missing the data field".to_owned()))
    }

    /// Send `request`, checking the status code but ignoring the body.
    pub(crate) async fn send_without_data(&self, request: RequestBuilder) -> Result<(), Error> {
        self.send_for_text(request).await.map(|_| ())
    }

    async fn send_for_text(&self, request: RequestBuilder) -> Result<String, Error> {
        let response = request
            .send()
            .await
            .inspect_err(|error| tracing::error!("Backend request failed: {error}"))
            .map_err(|error| Error::BackendUnavailable(error.to_string()))?;

        let status = response.status();
        let url = response.url().path().to_owned();

        match status {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::warn!("Backend rejected the access token for {url}");
                return Err(Error::Unauthorized);
            }
            StatusCode::NOT_FOUND => return Err(Error::NotFound),
            status => {
                tracing::error!("Backend responded with {status} for {url}");
                return Err(Error::BackendStatus(status.as_u16()));
            }
        }

        response.text().await.map_err(Error::from)
    }

    /// Exchange an email and password for an access token.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentials] if the backend rejects the credentials,
    /// otherwise the errors of [BackendClient::send].
    pub async fn log_in(&self, email: &str, password: &str) -> Result<AccessToken, Error> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&LogInRequest { email, password });

        match self.send::<String>(request).await {
            Ok(token) if token.is_empty() => Err(Error::BackendResponse(
                "log-in response contained an empty token".to_owned(),
            )),
            Ok(token) => Ok(AccessToken::new(token)),
            Err(Error::Unauthorized | Error::NotFound | Error::BackendStatus(400)) => {
                Err(Error::InvalidCredentials)
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod backend_client_tests {
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use reqwest::Method;
    use serde_json::{Value, json};

    use crate::{Error, auth::AccessToken, test_utils::spawn_backend};

    #[tokio::test]
    async fn unwraps_data_envelope() {
        let backend = spawn_backend(Router::new().route(
            "/thing",
            get(|| async { Json(json!({ "data": { "name": "A" }, "message": "ok" })) }),
        ))
        .await;
        let token = AccessToken::new("abc");

        let got: Value = backend
            .send(backend.request(Method::GET, "/thing", &token))
            .await
            .expect("Could not get thing");

        assert_eq!(got, json!({ "name": "A" }));
    }

    #[tokio::test]
    async fn forwards_access_token_as_cookie() {
        let backend = spawn_backend(Router::new().route(
            "/whoami",
            get(|headers: HeaderMap| async move {
                let cookie = headers
                    .get("cookie")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                Json(json!({ "data": cookie }))
            }),
        ))
        .await;
        let token = AccessToken::new("secret-token");

        let got: String = backend
            .send(backend.request(Method::GET, "/whoami", &token))
            .await
            .unwrap();

        assert_eq!(got, "access_token=secret-token");
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let backend = spawn_backend(
            Router::new()
                .route("/unauthorized", get(|| async { StatusCode::UNAUTHORIZED }))
                .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
                .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
                .route("/no-data", get(|| async { Json(json!({ "message": "ok" })) }))
                .route("/not-json", get(|| async { "hello" })),
        )
        .await;
        let token = AccessToken::new("abc");

        let cases = [
            ("/unauthorized", Error::Unauthorized),
            ("/missing", Error::NotFound),
            ("/broken", Error::BackendStatus(500)),
        ];
        for (path, want) in cases {
            let got = backend
                .send::<Value>(backend.request(Method::GET, path, &token))
                .await;
            assert_eq!(got, Err(want), "unexpected result for {path}");
        }

        for path in ["/no-data", "/not-json"] {
            let got = backend
                .send::<Value>(backend.request(Method::GET, path, &token))
                .await;
            assert!(
                matches!(got, Err(Error::BackendResponse(_))),
                "want BackendResponse error for {path}, got {got:?}"
            );
        }
    }

    #[tokio::test]
    async fn log_in_returns_token() {
        let backend = spawn_backend(Router::new().route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["email"] == "admin@example.com" && body["password"] == "hunter2" {
                    (StatusCode::OK, Json(json!({ "data": "token-123" })))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "nope" })))
                }
            }),
        ))
        .await;

        let token = backend.log_in("admin@example.com", "hunter2").await;
        assert_eq!(token, Ok(AccessToken::new("token-123")));

        let error = backend.log_in("admin@example.com", "wrong").await;
        assert_eq!(error, Err(Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        let backend = crate::backend::BackendClient::new(
            "http://127.0.0.1:1",
            std::time::Duration::from_secs(1),
        )
        .unwrap();

        let result = backend.log_in("admin@example.com", "hunter2").await;

        assert!(matches!(result, Err(Error::BackendUnavailable(_))));
    }
}
