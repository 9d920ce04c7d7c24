//! Session handling: log-in and log-out, the auth cookie, and the middleware
//! that guards pages behind a valid session.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod token;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{LoginState, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub(crate) use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub use token::AccessToken;
