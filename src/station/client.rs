//! Station requests to the backend.

use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::Deserialize;

use crate::{
    Error,
    auth::AccessToken,
    backend::BackendClient,
    station::domain::{Station, StationUpdate},
};

#[derive(Deserialize)]
struct StationItems {
    #[serde(default)]
    items: Vec<Station>,
}

/// An image uploaded with a new station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The fields of the station creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStation {
    pub name: String,
    pub detail: String,
    pub city: String,
    pub district: String,
    pub image: Option<StationImage>,
}

/// Get every station.
pub async fn get_all_stations(
    backend: &BackendClient,
    token: &AccessToken,
) -> Result<Vec<Station>, Error> {
    backend
        .send::<StationItems>(backend.request(Method::GET, "/station/getAll", token))
        .await
        .map(|stations| stations.items)
}

/// Get the station with `station_id`.
///
/// # Errors
/// Returns [Error::NotFound] if no station has that ID.
pub async fn get_station(
    backend: &BackendClient,
    token: &AccessToken,
    station_id: &str,
) -> Result<Station, Error> {
    get_all_stations(backend, token)
        .await?
        .into_iter()
        .find(|station| station.id == station_id)
        .ok_or(Error::NotFound)
}

/// Create a station, uploading its image as multipart form data.
pub async fn create_station(
    backend: &BackendClient,
    token: &AccessToken,
    station: NewStation,
) -> Result<(), Error> {
    let mut form = Form::new()
        .text("name", station.name)
        .text("detail", station.detail)
        .text("city", station.city)
        .text("district", station.district);

    if let Some(image) = station.image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|_| Error::NotAnImage)?;
        form = form.part("image", part);
    }

    backend
        .send_without_data(
            backend
                .request(Method::POST, "/station/create", token)
                .multipart(form),
        )
        .await
}

/// Update the station with `station_id`.
///
/// # Errors
/// Returns [Error::UpdateMissingStation] if the backend cannot find the station.
pub async fn update_station(
    backend: &BackendClient,
    token: &AccessToken,
    station_id: &str,
    update: &StationUpdate,
) -> Result<(), Error> {
    let path = format!("/station/update/{station_id}");

    backend
        .send_without_data(backend.request(Method::POST, &path, token).json(update))
        .await
        .map_err(|error| error.or_missing(Error::UpdateMissingStation))
}

/// Delete the station with `station_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingStation] if the backend cannot find the station.
pub async fn delete_station(
    backend: &BackendClient,
    token: &AccessToken,
    station_id: &str,
) -> Result<(), Error> {
    let path = format!("/station/delete/{station_id}");

    backend
        .send_without_data(backend.request(Method::DELETE, &path, token))
        .await
        .map_err(|error| error.or_missing(Error::DeleteMissingStation))
}

#[cfg(test)]
pub(crate) mod station_client_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Multipart, Path},
        http::StatusCode,
        routing::{delete, get, post},
    };
    use serde_json::{Value, json};

    use crate::{
        Error,
        auth::AccessToken,
        operating_state::OperatingState,
        station::domain::{Address, StationUpdate},
        test_utils::spawn_backend,
    };

    use super::{
        NewStation, StationImage, create_station, delete_station, get_all_stations, get_station,
        update_station,
    };

    /// A fake backend with two stations. Only "st-1" can be updated or deleted.
    pub(crate) fn fake_station_router() -> Router {
        Router::new()
            .route(
                "/station/getAll",
                get(|| async {
                    Json(json!({
                        "data": {
                            "items": [
                                {
                                    "_id": "st-1",
                                    "name": "Sai Gon Centre",
                                    "address": {
                                        "detail": "65 Le Loi",
                                        "district": "Phường Sài Gòn",
                                        "city": "Thành phố Hồ Chí Minh"
                                    },
                                    "slots": 8,
                                    "power": "120kW",
                                    "state": "available",
                                    "image": "https://example.com/st-1.png"
                                },
                                {
                                    "_id": "st-2",
                                    "name": "Tan Dinh",
                                    "address": { "detail": "2 Hai Ba Trung", "district": "", "city": "Thành phố Hồ Chí Minh" },
                                    "slots": "4",
                                    "power": 60,
                                    "state": "maintenance"
                                }
                            ]
                        }
                    }))
                }),
            )
            .route(
                "/station/update/{id}",
                post(|Path(id): Path<String>, Json(_body): Json<Value>| async move {
                    if id == "st-1" {
                        Ok(Json(json!({ "data": null, "message": "updated" })))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                }),
            )
            .route(
                "/station/delete/{id}",
                delete(|Path(id): Path<String>| async move {
                    if id == "st-1" {
                        Ok(Json(json!({ "message": "deleted" })))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                }),
            )
    }

    #[tokio::test]
    async fn lists_stations() {
        let backend = spawn_backend(fake_station_router()).await;
        let token = AccessToken::new("abc");

        let stations = get_all_stations(&backend, &token).await.unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].power, "60");
        assert_eq!(stations[1].state, OperatingState::Maintenance);
    }

    #[tokio::test]
    async fn get_station_by_id() {
        let backend = spawn_backend(fake_station_router()).await;
        let token = AccessToken::new("abc");

        let station = get_station(&backend, &token, "st-2").await.unwrap();
        let missing = get_station(&backend, &token, "st-404").await;

        assert_eq!(station.name, "Tan Dinh");
        assert_eq!(missing, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn create_sends_multipart_fields() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let router = {
            let received = received.clone();
            Router::new().route(
                "/station/create",
                post(move |mut multipart: Multipart| {
                    let received = received.clone();
                    async move {
                        while let Some(field) = multipart.next_field().await.unwrap() {
                            let name = field.name().unwrap_or_default().to_owned();
                            let content_type = field.content_type().map(str::to_owned);
                            let bytes = field.bytes().await.unwrap();
                            received
                                .lock()
                                .unwrap()
                                .push((name, content_type, bytes.len()));
                        }
                        Json(json!({ "data": { "_id": "st-3" } }))
                    }
                }),
            )
        };
        let backend = spawn_backend(router).await;

        create_station(
            &backend,
            &AccessToken::new("abc"),
            NewStation {
                name: "Ben Thanh".to_owned(),
                detail: "1 Pham Ngu Lao".to_owned(),
                city: "Thành phố Hồ Chí Minh".to_owned(),
                district: "Phường Bến Thành".to_owned(),
                image: Some(StationImage {
                    file_name: "station.png".to_owned(),
                    content_type: "image/png".to_owned(),
                    bytes: vec![0; 16],
                }),
            },
        )
        .await
        .expect("Could not create station");

        let received = received.lock().unwrap();
        let names: Vec<_> = received.iter().map(|(name, _, _)| name.as_str()).collect();
        assert_eq!(names, ["name", "detail", "city", "district", "image"]);
        assert_eq!(
            received[4],
            ("image".to_owned(), Some("image/png".to_owned()), 16)
        );
    }

    #[tokio::test]
    async fn update_and_delete_map_missing_station() {
        let backend = spawn_backend(fake_station_router()).await;
        let token = AccessToken::new("abc");
        let update = StationUpdate {
            name: "Renamed".to_owned(),
            address: Address::default(),
            state: OperatingState::Error,
        };

        assert_eq!(update_station(&backend, &token, "st-1", &update).await, Ok(()));
        assert_eq!(
            update_station(&backend, &token, "st-404", &update).await,
            Err(Error::UpdateMissingStation)
        );
        assert_eq!(delete_station(&backend, &token, "st-1").await, Ok(()));
        assert_eq!(
            delete_station(&backend, &token, "st-404").await,
            Err(Error::DeleteMissingStation)
        );
    }
}
