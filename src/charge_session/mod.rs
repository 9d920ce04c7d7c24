//! Manually recorded charge sessions.

mod create;
mod domain;

pub use create::{create_charge_session_endpoint, get_new_charge_session_page};
