//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/stations/{station_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the stations page.
pub const ROOT: &str = "/";
/// The page listing all charging stations.
pub const STATIONS_VIEW: &str = "/stations";
/// The page for creating a new station.
pub const NEW_STATION_VIEW: &str = "/stations/new";
/// The page for editing an existing station.
pub const EDIT_STATION_VIEW: &str = "/stations/{station_id}/edit";
/// The page listing the chargers of a station.
pub const CHARGERS_VIEW: &str = "/chargers";
/// The page for creating a new charger.
pub const NEW_CHARGER_VIEW: &str = "/chargers/new";
/// The page for editing an existing charger.
pub const EDIT_CHARGER_VIEW: &str = "/chargers/{charger_id}/edit";
/// The page for manually entering a charge session.
pub const NEW_CHARGE_SESSION_VIEW: &str = "/charge_sessions/new";
/// The monthly reports page.
pub const REPORTS_VIEW: &str = "/reports";
/// The CSV download of one page of the charge history.
pub const EXPORT_HISTORY: &str = "/reports/history/export";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create a station.
pub const POST_STATION: &str = "/api/stations";
/// The route to update a station.
pub const PUT_STATION: &str = "/api/stations/{station_id}";
/// The route to delete a station.
pub const DELETE_STATION: &str = "/api/stations/{station_id}";
/// The route for the ward options of a city.
pub const WARD_OPTIONS: &str = "/api/wards";
/// The route to create a charger.
pub const POST_CHARGER: &str = "/api/chargers";
/// The route to update a charger.
pub const PUT_CHARGER: &str = "/api/chargers/{charger_id}";
/// The route to delete a charger.
pub const DELETE_CHARGER: &str = "/api/chargers/{charger_id}";
/// The route for the charger options of a station.
pub const CHARGER_OPTIONS: &str = "/api/charger_options";
/// The route to record a charge session.
pub const POST_CHARGE_SESSION: &str = "/api/charge_sessions";
/// The route to close an open report view.
pub const REPORT_VIEW: &str = "/api/reports/views/{view_id}";
/// The route to move a report view to the previous month.
pub const REPORT_PREVIOUS_MONTH: &str = "/api/reports/views/{view_id}/previous";
/// The route to move a report view to the next month.
pub const REPORT_NEXT_MONTH: &str = "/api/reports/views/{view_id}/next";
/// The route for the chart of a report view.
pub const REPORT_CHART: &str = "/api/reports/views/{view_id}/chart";
/// The route for a page of the charge history table.
pub const REPORT_HISTORY: &str = "/api/reports/history";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/stations/{station_id}', '{station_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
