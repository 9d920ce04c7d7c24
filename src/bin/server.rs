use std::{
    env,
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use evstation_admin::{
    AppState, BackendClient, PaginationConfig, ProvinceClient, build_router, graceful_shutdown,
    logging_middleware,
};

/// The web server for the EV station admin dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the EV station backend API.
    #[arg(long, default_value = "https://qldapm-be.onrender.com/evstation/api")]
    backend_url: String,

    /// The base URL of the Vietnamese administrative-division API.
    #[arg(long, default_value = "https://provinces.open-api.vn/api/v2")]
    province_api_url: String,

    /// Directory containing an SSL certificate `cert.pem` and key `key.pem`.
    /// Serves plain HTTP when omitted.
    #[arg(long)]
    cert_path: Option<String>,

    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical timezone used for dates, e.g. "Asia/Ho_Chi_Minh".
    #[arg(long, default_value = "Asia/Ho_Chi_Minh")]
    timezone: String,

    /// The number of charge history rows per page.
    #[arg(long, default_value_t = 10)]
    page_size: u64,

    /// Minutes before an idle report view is dropped.
    #[arg(long, default_value_t = 60)]
    report_view_lifetime_minutes: u64,

    /// Seconds to wait for the backend before giving up on a request.
    #[arg(long, default_value_t = 30)]
    backend_timeout_secs: u64,

    /// Log every request and response body.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let Ok(secret) = env::var("SECRET") else {
        tracing::error!("The environment variable 'SECRET' must be set");
        return ExitCode::FAILURE;
    };

    let timeout = Duration::from_secs(args.backend_timeout_secs);
    let state = BackendClient::new(&args.backend_url, timeout)
        .and_then(|backend| {
            let provinces = ProvinceClient::new(&args.province_api_url, timeout)?;

            AppState::new(
                &secret,
                &args.timezone,
                PaginationConfig {
                    default_page_size: args.page_size,
                    ..Default::default()
                },
                backend,
                provinces,
                Duration::from_secs(args.report_view_lifetime_minutes * 60),
            )
        });

    let state = match state {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not create app state: {error}");
            return ExitCode::FAILURE;
        }
    };

    let router = build_router(state);
    let router = if args.log_bodies {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    };
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let result = match args.cert_path {
        Some(cert_path) => {
            let tls_config = match RustlsConfig::from_pem_file(
                PathBuf::from(&cert_path).join("cert.pem"),
                PathBuf::from(&cert_path).join("key.pem"),
            )
            .await
            {
                Ok(config) => config,
                Err(error) => {
                    tracing::error!("Could not open TLS certificates in {cert_path}: {error}");
                    return ExitCode::FAILURE;
                }
            };

            tracing::info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
        None => {
            tracing::info!("HTTP server listening on {}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Server stopped with an error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(filter::LevelFilter::INFO);

    let debug_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .map(|log_file| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG)
        })
        .inspect_err(|error| eprintln!("Could not open debug.log, file logging is disabled: {error}"))
        .ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("evstation_admin=debug,server=debug,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
