//! Stations listing page.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links},
    navigation::NavBar,
    station::{Station, get_all_stations},
};

const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/300x200?text=Station";

/// The state needed for the stations listing page.
#[derive(Debug, Clone)]
pub struct StationsPageState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for StationsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// Render the stations listing page.
pub async fn get_stations_page(
    State(state): State<StationsPageState>,
    Extension(token): Extension<AccessToken>,
) -> Result<Response, Error> {
    let stations = get_all_stations(&state.backend, &token)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve stations: {error}"))?;

    Ok(stations_view(&stations).into_response())
}

fn station_card(station: &Station) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_STATION_VIEW, &station.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_STATION, &station.id);
    let confirm_message = format!("Are you sure you want to delete '{}'?", station.name);
    let image_url = station.image_url().unwrap_or(PLACEHOLDER_IMAGE_URL);

    html! {
        article class=(CARD_STYLE) data-station-id=(station.id)
        {
            div class="relative p-2"
            {
                img src=(image_url) alt=(station.name) class="rounded-lg w-full h-32 object-cover";

                @if let Some(badge) = station.state.badge() {
                    div class="absolute top-3 left-4" { (badge) }
                }
            }

            div class="p-3 pt-0 space-y-1 text-sm text-gray-600 dark:text-gray-300"
            {
                h2 class="mb-2 text-base font-semibold text-gray-900 dark:text-white" { (station.name) }
                p class="line-clamp-2" { (station.address.full()) }
                p { "Charging slots: " (station.slots) }
                p { "Max power: " (station.power) }

                div class="flex justify-between items-center pt-3"
                {
                    a
                        href=(station.address.maps_url())
                        target="_blank"
                        rel="noopener noreferrer"
                        class=(LINK_STYLE)
                    {
                        "View map"
                    }

                    div class="flex gap-4"
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
    }
}

fn stations_view(stations: &[Station]) -> Markup {
    let new_station_route = endpoints::NEW_STATION_VIEW;
    let nav_bar = NavBar::new(endpoints::STATIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-4 lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Stations" }

                    a href=(new_station_route) class=(LINK_STYLE) { "Add Station" }
                }

                @if stations.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "No stations yet. "
                        a href=(new_station_route) class=(LINK_STYLE) { "Add your first station" }
                    }
                } @else {
                    div class="grid grid-cols-1 gap-6 md:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4"
                    {
                        @for station in stations {
                            (station_card(station))
                        }
                    }
                }
            }
        }
    };

    base("Stations", &[], &content)
}
