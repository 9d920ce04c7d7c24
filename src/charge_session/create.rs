//! Manual entry of charge sessions.

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use reqwest::Method;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::AccessToken,
    backend::BackendClient,
    charge_session::domain::{ChargeSessionForm, NewChargeSession, VEHICLE_TYPES},
    charger::{Charger, charger_options_view, get_chargers, station_select},
    endpoints,
    html::{FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, submit_button},
    navigation::NavBar,
    station::{Station, get_all_stations},
    timezone::get_local_offset,
};

const STATION_SELECT_ID: &str = "station_id";
const CHARGER_SELECT_ID: &str = "charger_id";

/// The state needed for entering charge sessions.
#[derive(Debug, Clone)]
pub struct ChargeSessionState {
    pub backend: BackendClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub local_timezone: String,
}

impl FromRef<AppState> for ChargeSessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Send a new charge session to the backend.
pub async fn create_charge_session(
    backend: &BackendClient,
    token: &AccessToken,
    session: &NewChargeSession,
) -> Result<(), Error> {
    backend
        .send_without_data(
            backend
                .request(Method::POST, "/chargeData/create", token)
                .json(session),
        )
        .await
}

/// Render the charge session entry page.
///
/// The charger select starts with the chargers of the first station.
pub async fn get_new_charge_session_page(
    State(state): State<ChargeSessionState>,
    Extension(token): Extension<AccessToken>,
) -> Result<Response, Error> {
    let stations = get_all_stations(&state.backend, &token)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve stations: {error}"))?;

    let chargers = match stations.first() {
        Some(station) => get_chargers(&state.backend, &token, Some(&station.id))
            .await
            .inspect_err(|error| {
                tracing::error!("Failed to retrieve chargers for {}: {error}", station.id)
            })?,
        None => Vec::new(),
    };

    Ok(new_charge_session_view(&stations, &chargers).into_response())
}

/// Handle the charge session form.
///
/// On success the form is reset by the client and a success alert is
/// swapped in out of band.
pub async fn create_charge_session_endpoint(
    State(state): State<ChargeSessionState>,
    Extension(token): Extension<AccessToken>,
    Form(form): Form<ChargeSessionForm>,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let session = match form.validate(local_offset) {
        Ok(session) => session,
        Err(error) => return error.into_alert_response(),
    };

    match create_charge_session(&state.backend, &token, &session).await {
        Ok(_) => (
            StatusCode::CREATED,
            Alert::SuccessSimple {
                message: "Charge session added successfully".to_owned(),
            }
            .into_oob_html(),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while adding a charge session: {error}");
            error.into_alert_response()
        }
    }
}

fn labelled_input(
    id: &str,
    label: &str,
    input_type: &str,
    placeholder: &str,
    step: Option<&str>,
) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }

            input
                id=(id)
                type=(input_type)
                name=(id)
                placeholder=(placeholder)
                step=[step]
                min=[(input_type == "number").then_some("0")]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn new_charge_session_form_view(stations: &[Station], chargers: &[Charger]) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_CHARGE_SESSION)
            hx-swap="none"
            hx-disabled-elt="#submit-button"
            hx-indicator="#indicator"
            hx-target-error="#alert-container"
            data-reset-on-success={ "#" (STATION_SELECT_ID) }
            class="w-full space-y-4 md:space-y-6"
        {
            (labelled_input("customer_id", "Customer ID", "text", "Phone number", None))

            div
                hx-get=(endpoints::CHARGER_OPTIONS)
                hx-trigger="change"
                hx-include={ "#" (STATION_SELECT_ID) }
                hx-target={ "#" (CHARGER_SELECT_ID) }
                hx-target-error="#alert-container"
            {
                (station_select(stations, stations.first().map(|station| station.id.as_str()), STATION_SELECT_ID))
            }

            div
            {
                label for=(CHARGER_SELECT_ID) class=(FORM_LABEL_STYLE) { "Charger" }

                select id=(CHARGER_SELECT_ID) name=(CHARGER_SELECT_ID) required class=(FORM_TEXT_INPUT_STYLE)
                {
                    (charger_options_view(chargers))
                }
            }

            div
            {
                label for="vehicle_type" class=(FORM_LABEL_STYLE) { "Vehicle Type" }

                select id="vehicle_type" name="vehicle_type" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Choose a brand" }

                    @for vehicle_type in VEHICLE_TYPES {
                        option value=(vehicle_type) { (vehicle_type) }
                    }
                }
            }

            div class="flex gap-4"
            {
                (labelled_input("date", "Start Date", "date", "", None))
                (labelled_input("time", "Start Time", "time", "", Some("1")))
            }

            (labelled_input("duration", "Duration (minutes)", "number", "45", Some("1")))
            (labelled_input("electricity", "Electricity (kWh)", "number", "37.5", Some("any")))

            (submit_button("Add Charge Session"))
        }
    }
}

fn new_charge_session_view(stations: &[Station], chargers: &[Charger]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CHARGE_SESSION_VIEW).into_html();
    let form = new_charge_session_form_view(stations, chargers);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Charge Session", &[], &content)
}


#[cfg(test)]
mod create_charge_session_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json, Router,
        extract::State,
        http::StatusCode,
        routing::post,
    };
    use axum_extra::extract::Form;
    use serde_json::{Value, json};

    use crate::{
        alert::ALERT_CONTAINER_ID,
        auth::AccessToken,
        charge_session::{
            create::{ChargeSessionState, create_charge_session_endpoint},
            domain::ChargeSessionForm,
        },
        test_utils::{TEST_TIMEZONE, parse_html_fragment, spawn_backend},
    };

    async fn get_state(received: Arc<Mutex<Vec<Value>>>) -> ChargeSessionState {
        let router = Router::new().route(
            "/chargeData/create",
            post(move |Json(body): Json<Value>| async move {
                received.lock().unwrap().push(body);
                (StatusCode::CREATED, Json(json!({ "data": { "_id": "cd-1" } })))
            }),
        );

        ChargeSessionState {
            backend: spawn_backend(router).await,
            local_timezone: TEST_TIMEZONE.to_owned(),
        }
    }

    fn form() -> ChargeSessionForm {
        serde_html_form::from_str(
            "customer_id=0901234567&station_id=st-1&charger_id=ch-1&vehicle_type=BYD\
            &date=2025-03-01&time=08%3A30&duration=45&electricity=37.5",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn adds_charge_session() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = get_state(received.clone()).await;

        let response =
            create_charge_session_endpoint(State(state), Extension(AccessToken::new("abc")), Form(form()))
                .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let html = parse_html_fragment(response).await;
        let container = html
            .select(&scraper::Selector::parse(&format!("#{ALERT_CONTAINER_ID}")).unwrap())
            .next()
            .expect("No out of band alert");
        assert!(
            container
                .text()
                .collect::<String>()
                .contains("Charge session added successfully")
        );

        let received = received.lock().unwrap();
        assert_eq!(received[0]["postId"], "ch-1");
        assert_eq!(received[0]["startTime"], "2025-03-01T01:30:00Z");
        assert_eq!(received[0]["chargeTime"], 45);
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = get_state(received.clone()).await;
        let form = ChargeSessionForm {
            electricity: String::new(),
            ..form()
        };

        let response =
            create_charge_session_endpoint(State(state), Extension(AccessToken::new("abc")), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Electricity must be a positive number of kWh"));
        assert!(received.lock().unwrap().is_empty());
    }
}
