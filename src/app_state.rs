//! Implements a struct that holds the state of the web server.

use std::time::Duration as StdDuration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, auth::DEFAULT_COOKIE_DURATION, backend::BackendClient, pagination::PaginationConfig,
    province::ProvinceClient, report::ReportViews, timezone::get_local_offset,
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The client for the EV station backend.
    pub backend: BackendClient,

    /// The client for the administrative-division API.
    pub provinces: ProvinceClient,

    /// The open report views.
    pub report_views: ReportViews,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    /// Report views that are idle for longer than `report_view_lifetime` are dropped.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(
        cookie_secret: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
        backend: BackendClient,
        provinces: ProvinceClient,
        report_view_lifetime: StdDuration,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            backend,
            provinces,
            report_views: ReportViews::new(report_view_lifetime),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod app_state_tests {
    use std::time::Duration;

    use crate::{
        Error, backend::BackendClient, pagination::PaginationConfig, province::ProvinceClient,
    };

    use super::AppState;

    fn new_state(timezone: &str) -> Result<AppState, Error> {
        AppState::new(
            "secret",
            timezone,
            PaginationConfig::default(),
            BackendClient::new("http://localhost:1", Duration::from_secs(1)).unwrap(),
            ProvinceClient::new("http://localhost:1", Duration::from_secs(1)).unwrap(),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn accepts_canonical_timezone() {
        let state = new_state("Asia/Ho_Chi_Minh").unwrap();

        assert_eq!(state.local_timezone, "Asia/Ho_Chi_Minh");
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = new_state("Mars/Olympus_Mons");

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
