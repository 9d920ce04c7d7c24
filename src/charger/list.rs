//! Chargers listing page, filtered by station.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    charger::{Charger, get_chargers},
    endpoints,
    html::{
        CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    station::{Station, get_all_stations},
};

const CHARGER_LIST_ID: &str = "charger-list";

/// The state needed for the chargers listing page.
#[derive(Debug, Clone)]
pub struct ChargersPageState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for ChargersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// The station whose chargers are listed.
#[derive(Debug, Default, Deserialize)]
pub struct StationFilter {
    #[serde(default)]
    pub station_id: Option<String>,
}

impl StationFilter {
    /// The chosen station, falling back to the first station.
    pub fn selected<'a>(&'a self, stations: &'a [Station]) -> Option<&'a str> {
        self.station_id
            .as_deref()
            .filter(|station_id| !station_id.is_empty())
            .or_else(|| stations.first().map(|station| station.id.as_str()))
    }
}

/// Render the chargers of the selected station.
pub async fn get_chargers_page(
    State(state): State<ChargersPageState>,
    Extension(token): Extension<AccessToken>,
    Query(filter): Query<StationFilter>,
) -> Result<Response, Error> {
    let stations = get_all_stations(&state.backend, &token)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve stations: {error}"))?;

    let selected = filter.selected(&stations);
    let chargers = match selected {
        Some(station_id) => get_chargers(&state.backend, &token, Some(station_id))
            .await
            .inspect_err(|error| {
                tracing::error!("Failed to retrieve chargers for {station_id}: {error}")
            })?,
        None => Vec::new(),
    };

    Ok(chargers_view(&stations, selected, &chargers).into_response())
}

/// A select of every station, with `selected` chosen.
///
/// Wrap the select in an element carrying `hx-trigger="change"` to react to
/// the user picking another station.
pub fn station_select(stations: &[Station], selected: Option<&str>, name: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { "Station" }

            select id=(name) name=(name) required class=(FORM_TEXT_INPUT_STYLE)
            {
                @if stations.is_empty() {
                    option value="" { "No stations" }
                }

                @for station in stations {
                    option value=(station.id) selected[Some(station.id.as_str()) == selected]
                    {
                        (station.name)
                    }
                }
            }
        }
    }
}

fn charger_card(charger: &Charger) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CHARGER_VIEW, &charger.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_CHARGER, &charger.id);
    let confirm_message = format!("Are you sure you want to delete '{}'?", charger.name);
    let brands = if charger.support_brands.is_empty() {
        "None".to_owned()
    } else {
        charger.support_brands.join(", ")
    };

    html! {
        article class={ "p-4 space-y-1 text-sm " (CARD_STYLE) }
        {
            div class="flex justify-between items-start gap-2"
            {
                h2 class="text-base font-semibold text-gray-900 dark:text-white" { (charger.name) }

                @if let Some(badge) = charger.state.badge() {
                    (badge)
                }
            }

            p class="text-gray-600 dark:text-gray-300" { "Power: " (charger.power) " kW" }
            p class="text-gray-600 dark:text-gray-300" { "Supported brands: " (brands) }

            div class="flex justify-end gap-4 pt-3"
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &confirm_message,
                    "closest article",
                    "delete",
                ))
            }
        }
    }
}

fn chargers_view(stations: &[Station], selected: Option<&str>, chargers: &[Charger]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CHARGERS_VIEW).into_html();
    let new_charger_url = match selected {
        Some(station_id) => format!("{}?station_id={station_id}", endpoints::NEW_CHARGER_VIEW),
        None => endpoints::NEW_CHARGER_VIEW.to_owned(),
    };
    let list_target = format!("#{CHARGER_LIST_ID}");

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-4 lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Chargers" }

                    a href=(new_charger_url) class=(LINK_STYLE) { "Add Charger" }
                }

                // Switching station swaps the list in place and keeps the URL shareable.
                div
                    class="max-w-sm"
                    hx-get=(endpoints::CHARGERS_VIEW)
                    hx-trigger="change"
                    hx-include="#station_id"
                    hx-select=(list_target)
                    hx-target=(list_target)
                    hx-swap="outerHTML"
                    hx-push-url="true"
                {
                    (station_select(stations, selected, "station_id"))
                }

                div id=(CHARGER_LIST_ID)
                {
                    @if chargers.is_empty() {
                        p class="text-center text-gray-500 dark:text-gray-400"
                        {
                            "This station has no chargers yet. "
                            a href=(new_charger_url) class=(LINK_STYLE) { "Add a charger" }
                        }
                    } @else {
                        div class="grid grid-cols-1 gap-6 md:grid-cols-2 lg:grid-cols-3"
                        {
                            @for charger in chargers {
                                (charger_card(charger))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Chargers", &[], &content)
}
