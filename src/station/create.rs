//! Station creation page and endpoint.

use axum::{
    Extension,
    extract::{FromRef, Multipart, Query, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AccessToken,
    backend::BackendClient,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, submit_button},
    navigation::NavBar,
    province::{Province, ProvinceClient, Ward},
    station::client::{NewStation, StationImage, create_station},
};

/// The largest station image that can be uploaded.
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;
/// The request body limit for the creation endpoint, leaving room for the text fields.
pub const CREATE_STATION_BODY_LIMIT: usize = MAX_IMAGE_SIZE + 64 * 1024;

const WARD_SELECT_ID: &str = "district";

/// The state needed for creating a station.
#[derive(Debug, Clone)]
pub struct NewStationState {
    pub backend: BackendClient,
    pub provinces: ProvinceClient,
}

impl FromRef<AppState> for NewStationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            provinces: state.provinces.clone(),
        }
    }
}

/// The city whose wards should be listed.
#[derive(Debug, Deserialize)]
pub struct WardQuery {
    #[serde(default)]
    pub city: String,
}

/// Render the station creation page.
pub async fn get_new_station_page(State(state): State<NewStationState>) -> Response {
    let provinces = state.provinces.get_provinces_or_empty().await;

    new_station_view(&provinces).into_response()
}

/// Render the ward options for the city in the query string.
pub async fn get_ward_options(
    State(state): State<NewStationState>,
    Query(query): Query<WardQuery>,
) -> Response {
    let wards = if query.city.is_empty() {
        Vec::new()
    } else {
        state
            .provinces
            .get_wards_for_city(&query.city)
            .await
            .inspect_err(|error| {
                tracing::error!("Could not get wards for {:?}: {error}", query.city)
            })
            .unwrap_or_default()
    };

    ward_options_view(&wards).into_response()
}

/// Handle the multipart station creation form.
pub async fn create_station_endpoint(
    State(state): State<NewStationState>,
    Extension(token): Extension<AccessToken>,
    multipart: Multipart,
) -> Response {
    let new_station = match read_new_station(multipart).await {
        Ok(new_station) => new_station,
        Err(error) => return error.into_alert_response(),
    };

    match create_station(&state.backend, &token, new_station).await {
        Ok(_) => (
            HxRedirect(endpoints::STATIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a station: {error}");
            error.into_alert_response()
        }
    }
}

/// Check that an uploaded file is an image within the size limit.
fn check_image(content_type: &str, size: usize) -> Result<(), Error> {
    if !content_type.starts_with("image/") {
        return Err(Error::NotAnImage);
    }

    if size > MAX_IMAGE_SIZE {
        return Err(Error::ImageTooLarge(MAX_IMAGE_SIZE));
    }

    Ok(())
}

async fn read_text_field(field: Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .map(|text| text.trim().to_owned())
        .inspect_err(|error| tracing::error!("Could not read multipart field: {error}"))
        .map_err(|error| Error::MultipartError(error.body_text()))
}

async fn read_image_field(field: Field<'_>) -> Result<Option<StationImage>, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let content_type = field.content_type().unwrap_or_default().to_owned();
    let bytes = field
        .bytes()
        .await
        .inspect_err(|error| tracing::error!("Could not read uploaded image: {error}"))
        .map_err(|error| Error::MultipartError(error.body_text()))?;

    // Browsers send an empty part when no file was chosen.
    if bytes.is_empty() && file_name.is_empty() {
        return Ok(None);
    }

    check_image(&content_type, bytes.len())?;
    tracing::debug!("Received image '{file_name}' that is {} bytes", bytes.len());

    Ok(Some(StationImage {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

async fn read_new_station(mut multipart: Multipart) -> Result<NewStation, Error> {
    let mut new_station = NewStation::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "name" => new_station.name = read_text_field(field).await?,
            "detail" => new_station.detail = read_text_field(field).await?,
            "city" => new_station.city = read_text_field(field).await?,
            "district" => new_station.district = read_text_field(field).await?,
            "image" => new_station.image = read_image_field(field).await?,
            other => tracing::debug!("Ignoring unexpected multipart field {other:?}"),
        }
    }

    if new_station.name.is_empty() {
        return Err(Error::InvalidForm("Station name cannot be empty".to_owned()));
    }

    if new_station.city.is_empty() {
        return Err(Error::InvalidForm("Please choose a city".to_owned()));
    }

    if new_station.district.is_empty() {
        return Err(Error::InvalidForm("Please choose a ward".to_owned()));
    }

    Ok(new_station)
}

fn ward_options_view(wards: &[Ward]) -> Markup {
    html! {
        option value="" { "Choose a ward" }

        @for ward in wards {
            option value=(ward.name) { (ward.name) }
        }
    }
}

fn new_station_view(provinces: &[Province]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_STATION_VIEW).into_html();
    let form = new_station_form_view(provinces);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Station", &[], &content)
}

fn new_station_form_view(provinces: &[Province]) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_STATION)
            hx-encoding="multipart/form-data"
            hx-disabled-elt="#submit-button"
            hx-indicator="#indicator"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Station Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Station Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="city" class=(FORM_LABEL_STYLE) { "City" }

                select
                    id="city"
                    name="city"
                    required
                    hx-get=(endpoints::WARD_OPTIONS)
                    hx-trigger="change"
                    hx-target={ "#" (WARD_SELECT_ID) }
                    hx-target-error="#alert-container"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Choose a city" }

                    @for province in provinces {
                        option value=(province.name) { (province.name) }
                    }
                }
            }

            div
            {
                label for=(WARD_SELECT_ID) class=(FORM_LABEL_STYLE) { "Ward" }

                select
                    id=(WARD_SELECT_ID)
                    name="district"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (ward_options_view(&[]))
                }
            }

            div
            {
                label for="detail" class=(FORM_LABEL_STYLE) { "Street Address" }

                input
                    id="detail"
                    type="text"
                    name="detail"
                    placeholder="65 Le Loi"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="image" class=(FORM_LABEL_STYLE) { "Image" }

                input
                    id="image"
                    type="file"
                    name="image"
                    accept="image/*"
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    "PNG, JPG or GIF up to 5 MB."
                }
            }

            (submit_button("Add Station"))
        }
    }
}
