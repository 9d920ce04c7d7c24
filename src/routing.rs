//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    charge_session::{create_charge_session_endpoint, get_new_charge_session_page},
    charger::{
        create_charger_endpoint, delete_charger_endpoint, get_charger_options,
        get_chargers_page, get_edit_charger_page, get_new_charger_page, update_charger_endpoint,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    report::{
        delete_report_view, export_history, get_history_page, get_report_chart,
        get_reports_page, post_next_month, post_previous_month,
    },
    station::{
        CREATE_STATION_BODY_LIMIT, create_station_endpoint, delete_station_endpoint,
        get_edit_station_page, get_new_station_page, get_stations_page, get_ward_options,
        update_station_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::STATIONS_VIEW, get(get_stations_page))
        .route(endpoints::NEW_STATION_VIEW, get(get_new_station_page))
        .route(endpoints::EDIT_STATION_VIEW, get(get_edit_station_page))
        .route(endpoints::CHARGERS_VIEW, get(get_chargers_page))
        .route(endpoints::NEW_CHARGER_VIEW, get(get_new_charger_page))
        .route(endpoints::EDIT_CHARGER_VIEW, get(get_edit_charger_page))
        .route(
            endpoints::NEW_CHARGE_SESSION_VIEW,
            get(get_new_charge_session_page),
        )
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::EXPORT_HISTORY, get(export_history))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are requested by HTMX, so they need the HX-REDIRECT header for auth redirects to work properly.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::POST_STATION,
                post(create_station_endpoint)
                    .layer(DefaultBodyLimit::max(CREATE_STATION_BODY_LIMIT)),
            )
            .route(endpoints::PUT_STATION, put(update_station_endpoint))
            .route(endpoints::DELETE_STATION, delete(delete_station_endpoint))
            .route(endpoints::WARD_OPTIONS, get(get_ward_options))
            .route(endpoints::POST_CHARGER, post(create_charger_endpoint))
            .route(endpoints::PUT_CHARGER, put(update_charger_endpoint))
            .route(endpoints::DELETE_CHARGER, delete(delete_charger_endpoint))
            .route(endpoints::CHARGER_OPTIONS, get(get_charger_options))
            .route(
                endpoints::POST_CHARGE_SESSION,
                post(create_charge_session_endpoint),
            )
            .route(endpoints::REPORT_VIEW, delete(delete_report_view))
            .route(endpoints::REPORT_PREVIOUS_MONTH, post(post_previous_month))
            .route(endpoints::REPORT_NEXT_MONTH, post(post_next_month))
            .route(endpoints::REPORT_CHART, get(get_report_chart))
            .route(endpoints::REPORT_HISTORY, get(get_history_page))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the stations page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::STATIONS_VIEW)
}
