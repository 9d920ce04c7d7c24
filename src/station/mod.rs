//! Charging station management.

mod client;
mod create;
mod delete;
mod domain;
mod edit;
mod list;

pub use client::{get_all_stations, get_station};
pub use create::{
    CREATE_STATION_BODY_LIMIT, create_station_endpoint, get_new_station_page, get_ward_options,
};
pub use delete::delete_station_endpoint;
pub use domain::{Address, Station, StationId};
pub use edit::{get_edit_station_page, update_station_endpoint};
pub use list::get_stations_page;
