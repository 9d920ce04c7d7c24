use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::{
    AppState, backend::BackendClient, pagination::PaginationConfig, province::ProvinceClient,
};

pub(crate) const TEST_TIMEZONE: &str = "Asia/Ho_Chi_Minh";

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind fake backend");
    let address = listener
        .local_addr()
        .expect("Could not get fake backend address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake backend stopped unexpectedly")
    });

    format!("http://{address}")
}

/// Serve `router` on an ephemeral local port and return a [BackendClient]
/// pointed at it.
pub(crate) async fn spawn_backend(router: Router) -> BackendClient {
    let base_url = serve(router).await;

    BackendClient::new(&base_url, Duration::from_secs(5)).expect("Could not create backend client")
}

/// Serve `router` on an ephemeral local port and return a [ProvinceClient]
/// pointed at it.
pub(crate) async fn spawn_province_api(router: Router) -> ProvinceClient {
    let base_url = serve(router).await;

    ProvinceClient::new(&base_url, Duration::from_secs(5))
        .expect("Could not create province client")
}

/// An [AppState] whose backend is `backend_router` served locally.
///
/// The province API points at an empty router, so every lookup returns 404.
pub(crate) async fn app_state_with_backend(backend_router: Router) -> AppState {
    app_state_with_apis(backend_router, Router::new()).await
}

/// An [AppState] whose backend and province API are served locally.
pub(crate) async fn app_state_with_apis(backend_router: Router, province_router: Router) -> AppState {
    AppState::new(
        "foobar",
        TEST_TIMEZONE,
        PaginationConfig::default(),
        spawn_backend(backend_router).await,
        spawn_province_api(province_router).await,
        Duration::from_secs(60),
    )
    .expect("Could not create app state")
}
