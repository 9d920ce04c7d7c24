//! Station editing page and endpoint.

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, submit_button},
    navigation::NavBar,
    operating_state::OperatingState,
    station::{
        Station, StationId,
        client::{get_station, update_station},
        domain::StationFormData,
    },
};

/// The state needed for editing a station.
#[derive(Debug, Clone)]
pub struct EditStationState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for EditStationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// Render the station editing page.
pub async fn get_edit_station_page(
    Path(station_id): Path<StationId>,
    State(state): State<EditStationState>,
    Extension(token): Extension<AccessToken>,
) -> Result<Response, Error> {
    let station = get_station(&state.backend, &token, &station_id)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve station {station_id}: {error}"))?;

    Ok(edit_station_view(&station).into_response())
}

/// Handle the station update form submission.
pub async fn update_station_endpoint(
    Path(station_id): Path<StationId>,
    State(state): State<EditStationState>,
    Extension(token): Extension<AccessToken>,
    Form(form_data): Form<StationFormData>,
) -> Response {
    let update = match form_data.into_update() {
        Ok(update) => update,
        Err(error) => return error.into_alert_response(),
    };

    match update_station(&state.backend, &token, &station_id, &update).await {
        Ok(_) => (
            HxRedirect(endpoints::STATIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingStation) => Error::UpdateMissingStation.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating station {station_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_station_view(station: &Station) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_STATION_VIEW, &station.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let form = edit_station_form_view(station);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Station", &[], &content)
}

fn text_field(id: &str, label: &str, value: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }

            input
                id=(id)
                type="text"
                name=(id)
                value=(value)
                required[required]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn state_select(current: &OperatingState) -> Markup {
    let is_known = OperatingState::EDITABLE.contains(current);

    html! {
        div
        {
            label for="state" class=(FORM_LABEL_STYLE) { "Status" }

            select id="state" name="state" class=(FORM_TEXT_INPUT_STYLE)
            {
                @if !is_known {
                    option value=(current.as_str()) selected { (current.label()) }
                }

                @for choice in &OperatingState::EDITABLE {
                    option value=(choice.as_str()) selected[choice == current] { (choice.label()) }
                }
            }
        }
    }
}

fn edit_station_form_view(station: &Station) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_STATION, &station.id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-disabled-elt="#submit-button"
            hx-indicator="#indicator"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (text_field("name", "Station Name", &station.name, true))
            (text_field("detail", "Street Address", &station.address.detail, false))
            (text_field("district", "Ward", &station.address.district, false))
            (text_field("city", "City", &station.address.city, true))
            (state_select(&station.state))

            (submit_button("Update Station"))
        }
    }
}

#[cfg(test)]
mod edit_station_page_tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;

    use crate::{
        auth::AccessToken,
        station::{
            client::station_client_tests::fake_station_router,
            edit::{EditStationState, get_edit_station_page},
        },
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document, spawn_backend,
        },
    };

    async fn get_state() -> EditStationState {
        EditStationState {
            backend: spawn_backend(fake_station_router()).await,
        }
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_edit_station_page(
            Path("st-2".to_owned()),
            State(get_state().await),
            Extension(AccessToken::new("abc")),
        )
        .await
        .expect("Could not render edit page");

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/stations/st-2", "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Tan Dinh");
        assert_form_input_with_value(&form, "city", "text", "Thành phố Hồ Chí Minh");

        let selected = form
            .select(&Selector::parse("select[name=state] option[selected]").unwrap())
            .next()
            .expect("No selected state");
        assert_eq!(selected.value().attr("value"), Some("maintenance"));
    }

    #[tokio::test]
    async fn missing_station_renders_not_found() {
        let result = get_edit_station_page(
            Path("st-404".to_owned()),
            State(get_state().await),
            Extension(AccessToken::new("abc")),
        )
        .await;

        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
