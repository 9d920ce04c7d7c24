//! Charger creation page and endpoint.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since axum's Form cannot parse the repeated
// "brands" checkbox fields into a list.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    charger::{
        Charger,
        client::create_charger,
        domain::{ChargerFormData, ChargerPayload},
        form::charger_fields,
        list::StationFilter,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
    operating_state::OperatingState,
    station::{Station, get_all_stations},
};

/// The state needed for creating a charger.
#[derive(Debug, Clone)]
pub struct NewChargerState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for NewChargerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// Render the charger creation page, preselecting the station in the query.
pub async fn get_new_charger_page(
    State(state): State<NewChargerState>,
    Extension(token): Extension<AccessToken>,
    Query(filter): Query<StationFilter>,
) -> Result<Response, Error> {
    let stations = get_all_stations(&state.backend, &token)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve stations: {error}"))?;

    let charger = Charger {
        station_id: filter.selected(&stations).unwrap_or_default().to_owned(),
        ..Default::default()
    };

    Ok(new_charger_view(&stations, &charger).into_response())
}

/// Handle the charger creation form.
///
/// New chargers always start out available.
pub async fn create_charger_endpoint(
    State(state): State<NewChargerState>,
    Extension(token): Extension<AccessToken>,
    Form(form_data): Form<ChargerFormData>,
) -> Response {
    let payload = match form_data.into_payload() {
        Ok(payload) => ChargerPayload {
            state: OperatingState::Available,
            ..payload
        },
        Err(error) => return error.into_alert_response(),
    };

    match create_charger(&state.backend, &token, &payload).await {
        Ok(_) => (
            HxRedirect(format!(
                "{}?station_id={}",
                endpoints::CHARGERS_VIEW,
                payload.station_id
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a charger: {error}");
            error.into_alert_response()
        }
    }
}

fn new_charger_view(stations: &[Station], charger: &Charger) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CHARGER_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_CHARGER)
                hx-disabled-elt="#submit-button"
                hx-indicator="#indicator"
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (charger_fields(stations, charger))
                (submit_button("Add Charger"))
            }
        }
    };

    base("Add Charger", &[], &content)
}

#[cfg(test)]
mod new_charger_page_tests {
    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        auth::AccessToken,
        charger::{
            client::charger_client_tests::fake_charger_router,
            create::{NewChargerState, get_new_charger_page},
            list::StationFilter,
        },
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document, spawn_backend,
        },
    };

    #[tokio::test]
    async fn render_page_with_station_preselected() {
        let state = NewChargerState {
            backend: spawn_backend(fake_charger_router(Default::default())).await,
        };

        let response = get_new_charger_page(
            State(state),
            Extension(AccessToken::new("abc")),
            Query(StationFilter {
                station_id: Some("st-2".to_owned()),
            }),
        )
        .await
        .expect("Could not render new charger page");

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_CHARGER, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "power", "number");
        assert_form_submit_button(&form);

        let brand_count = form
            .select(&Selector::parse("input[name=brands]").unwrap())
            .count();
        assert_eq!(brand_count, 5);

        let selected = form
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value"));
        assert_eq!(selected, Some("st-2"));
    }
}
