//! The backend access token carried in the session cookie.

use std::fmt;

/// An opaque access token issued by the backend at log-in.
///
/// The token is forwarded to the backend with every request made on behalf
/// of the logged-in administrator. `Debug` output is redacted so the token
/// never ends up in the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(********)")
    }
}
