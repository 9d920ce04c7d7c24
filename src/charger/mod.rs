//! Charger (charging post) management.

mod client;
mod create;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod options;

pub use client::get_chargers;
#[cfg(test)]
pub(crate) use client::charger_client_tests::fake_charger_router;
pub use create::{create_charger_endpoint, get_new_charger_page};
pub use delete::delete_charger_endpoint;
pub use domain::{Charger, ChargerId, SUPPORTED_BRANDS};
pub use edit::{get_edit_charger_page, update_charger_endpoint};
pub use list::{StationFilter, get_chargers_page, station_select};
pub use options::{charger_options_view, get_charger_options};
