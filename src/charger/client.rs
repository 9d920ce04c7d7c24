//! Charger requests to the backend.

use reqwest::Method;
use serde::Deserialize;

use crate::{
    Error,
    auth::AccessToken,
    backend::BackendClient,
    charger::domain::{Charger, ChargerPayload},
};

#[derive(Deserialize)]
struct ChargerPosts {
    #[serde(default)]
    posts: Vec<Charger>,
}

/// Get the chargers of `station_id`, or every charger when `None`.
pub async fn get_chargers(
    backend: &BackendClient,
    token: &AccessToken,
    station_id: Option<&str>,
) -> Result<Vec<Charger>, Error> {
    let mut request = backend.request(Method::GET, "/post/getAll", token);

    if let Some(station_id) = station_id {
        request = request.query(&[("stationId", station_id)]);
    }

    backend
        .send::<ChargerPosts>(request)
        .await
        .map(|chargers| chargers.posts)
}

/// Get the charger with `charger_id`.
///
/// # Errors
/// Returns [Error::NotFound] if no charger has that ID.
pub async fn get_charger(
    backend: &BackendClient,
    token: &AccessToken,
    charger_id: &str,
) -> Result<Charger, Error> {
    get_chargers(backend, token, None)
        .await?
        .into_iter()
        .find(|charger| charger.id == charger_id)
        .ok_or(Error::NotFound)
}

/// Create a charger.
pub async fn create_charger(
    backend: &BackendClient,
    token: &AccessToken,
    payload: &ChargerPayload,
) -> Result<(), Error> {
    backend
        .send_without_data(
            backend
                .request(Method::POST, "/post/create", token)
                .json(payload),
        )
        .await
}

/// Update the charger with `charger_id`.
///
/// # Errors
/// Returns [Error::UpdateMissingCharger] if the backend cannot find the charger.
pub async fn update_charger(
    backend: &BackendClient,
    token: &AccessToken,
    charger_id: &str,
    payload: &ChargerPayload,
) -> Result<(), Error> {
    let path = format!("/post/update/{charger_id}");

    backend
        .send_without_data(backend.request(Method::POST, &path, token).json(payload))
        .await
        .map_err(|error| error.or_missing(Error::UpdateMissingCharger))
}

/// Delete the charger with `charger_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingCharger] if the backend cannot find the charger.
pub async fn delete_charger(
    backend: &BackendClient,
    token: &AccessToken,
    charger_id: &str,
) -> Result<(), Error> {
    let path = format!("/post/delete/{charger_id}");

    backend
        .send_without_data(backend.request(Method::DELETE, &path, token))
        .await
        .map_err(|error| error.or_missing(Error::DeleteMissingCharger))
}
