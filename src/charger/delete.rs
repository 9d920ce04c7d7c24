//! Charger deletion endpoint.

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
    charger::{ChargerId, client::delete_charger},
};

/// The state needed for deleting a charger.
#[derive(Debug, Clone)]
pub struct DeleteChargerState {
    pub backend: BackendClient,
}

impl FromRef<AppState> for DeleteChargerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// Handle charger deletion. Returns success alert or error.
pub async fn delete_charger_endpoint(
    Path(charger_id): Path<ChargerId>,
    State(state): State<DeleteChargerState>,
    Extension(token): Extension<AccessToken>,
) -> Response {
    match delete_charger(&state.backend, &token, &charger_id).await {
        Ok(_) => Alert::SuccessSimple {
            message: "Charger deleted successfully".to_owned(),
        }
        .into_oob_html()
        .into_response(),
        Err(Error::DeleteMissingCharger) => Error::DeleteMissingCharger.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting charger {charger_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
