//! Charger editing page and endpoint.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    charger::{
        Charger, ChargerId,
        client::{get_charger, update_charger},
        domain::ChargerFormData,
        form::charger_fields,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
    station::{Station, get_all_stations},
};

/// The state needed for editing a charger.
#[derive(Debug, Clone)]
pub struct EditChargerState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for EditChargerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// Render the charger editing page.
pub async fn get_edit_charger_page(
    Path(charger_id): Path<ChargerId>,
    State(state): State<EditChargerState>,
    Extension(token): Extension<AccessToken>,
) -> Result<Response, Error> {
    let charger = get_charger(&state.backend, &token, &charger_id)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve charger {charger_id}: {error}"))?;
    let stations = get_all_stations(&state.backend, &token)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve stations: {error}"))?;

    Ok(edit_charger_view(&stations, &charger).into_response())
}

/// Handle the charger update form.
///
/// The charger keeps the state sent back in the form's hidden field.
pub async fn update_charger_endpoint(
    Path(charger_id): Path<ChargerId>,
    State(state): State<EditChargerState>,
    Extension(token): Extension<AccessToken>,
    Form(form_data): Form<ChargerFormData>,
) -> Response {
    let payload = match form_data.into_payload() {
        Ok(payload) => payload,
        Err(error) => return error.into_alert_response(),
    };

    match update_charger(&state.backend, &token, &charger_id, &payload).await {
        Ok(_) => (
            HxRedirect(format!(
                "{}?station_id={}",
                endpoints::CHARGERS_VIEW,
                payload.station_id
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingCharger) => Error::UpdateMissingCharger.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating charger {charger_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_charger_view(stations: &[Station], charger: &Charger) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CHARGER_VIEW, &charger.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CHARGER, &charger.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-disabled-elt="#submit-button"
                hx-indicator="#indicator"
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                input type="hidden" name="state" value=(charger.state.as_str());

                (charger_fields(stations, charger))
                (submit_button("Update Charger"))
            }
        }
    };

    base("Edit Charger", &[], &content)
}

#[cfg(test)]
mod edit_charger_page_tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;

    use crate::{
        auth::AccessToken,
        charger::{
            client::charger_client_tests::fake_charger_router,
            edit::{EditChargerState, get_edit_charger_page},
        },
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document, spawn_backend,
        },
    };

    async fn get_state() -> EditChargerState {
        EditChargerState {
            backend: spawn_backend(fake_charger_router(Default::default())).await,
        }
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_edit_charger_page(
            Path("ch-2".to_owned()),
            State(get_state().await),
            Extension(AccessToken::new("abc")),
        )
        .await
        .expect("Could not render edit charger page");

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/chargers/ch-2", "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Post B");
        assert_form_input_with_value(&form, "power", "number", "120");

        let state = form
            .select(&Selector::parse("input[name=state]").unwrap())
            .next()
            .expect("No state field");
        assert_eq!(state.value().attr("value"), Some("maintenance"));
    }

    #[tokio::test]
    async fn missing_charger_renders_not_found() {
        let response = get_edit_charger_page(
            Path("ch-404".to_owned()),
            State(get_state().await),
            Extension(AccessToken::new("abc")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
