//! Station deletion endpoint.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    alert::Alert,
    auth::AccessToken,
    backend::BackendClient,
    station::{StationId, client::delete_station},
};

/// The state needed for deleting a station.
#[derive(Debug, Clone)]
pub struct DeleteStationState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for DeleteStationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// Handle station deletion.
///
/// The deleted card is removed by htmx, the success alert is swapped
/// into the alert container out of band.
pub async fn delete_station_endpoint(
    Path(station_id): Path<StationId>,
    State(state): State<DeleteStationState>,
    Extension(token): Extension<AccessToken>,
) -> Response {
    match delete_station(&state.backend, &token, &station_id).await {
        Ok(_) => Alert::SuccessSimple {
            message: "Station deleted successfully".to_owned(),
        }
        .into_oob_html()
        .into_response(),
        Err(Error::DeleteMissingStation) => Error::DeleteMissingStation.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting station {station_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
