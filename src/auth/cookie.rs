//! Functions for storing the backend access token in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::AccessToken};

pub(crate) const COOKIE_TOKEN: &str = "access_token";
/// The default duration for which auth cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

fn build_cookie(value: String) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Add the auth cookie holding `token` to the cookie jar, indicating that a
/// user is logged in.
///
/// The cookie expires `duration` from now.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    token: &AccessToken,
    duration: Duration,
) -> PrivateCookieJar {
    let mut cookie = build_cookie(token.as_str().to_owned());
    cookie.set_expires(OffsetDateTime::now_utc() + duration);

    jar.add(cookie)
}

/// Set the auth cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut cookie = build_cookie("deleted".to_owned());
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

/// Get the access token from the auth cookie.
///
/// # Errors
/// Returns [Error::Unauthorized] if the cookie is missing, could not be
/// decrypted, or holds an empty token.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<AccessToken, Error> {
    jar.get(COOKIE_TOKEN)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|token| !token.is_empty())
        .map(AccessToken::new)
        .ok_or(Error::Unauthorized)
}
