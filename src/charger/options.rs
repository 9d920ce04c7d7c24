//! The charger options of a station, loaded into selects by htmx.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    charger::{Charger, client::get_chargers, list::StationFilter},
};

/// The state needed for listing charger options.
#[derive(Debug, Clone)]
pub struct ChargerOptionsState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for ChargerOptionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// Render `option` elements for the chargers of the station in the query.
///
/// Backend failures other than an expired session render only the placeholder.
pub async fn get_charger_options(
    State(state): State<ChargerOptionsState>,
    Extension(token): Extension<AccessToken>,
    Query(filter): Query<StationFilter>,
) -> Response {
    let station_id = filter
        .station_id
        .as_deref()
        .filter(|station_id| !station_id.is_empty());

    let chargers = match station_id {
        Some(station_id) => match get_chargers(&state.backend, &token, Some(station_id)).await {
            Ok(chargers) => chargers,
            Err(Error::Unauthorized) => return Error::Unauthorized.into_alert_response(),
            Err(error) => {
                tracing::error!("Could not get chargers for {station_id}: {error}");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    charger_options_view(&chargers).into_response()
}

/// The options for a charger select, starting with an empty placeholder.
pub fn charger_options_view(chargers: &[Charger]) -> Markup {
    html! {
        option value="" { "Choose a charger" }

        @for charger in chargers {
            option value=(charger.id) { (charger.name) " (" (charger.power) " kW)" }
        }
    }
}
