pub mod api;
mod config;
mod directory;
mod providers;

use std::sync::Arc;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use directory::{DirectoryStore, StationDirectory};
use providers::mta::MtaProvider;

#[derive(OpenApi)]
#[openapi(
    info(title = "Trainboard API", version = "0.1.0"),
    paths(
        api::arrivals::get_station_arrivals,
        api::health::health_check,
    ),
    components(schemas(
        api::ErrorResponse,
        api::arrivals::ArrivalsResponse,
        api::arrivals::StationSummary,
        api::arrivals::DebugCounters,
        api::health::HealthResponse,
        crate::directory::Station,
        crate::directory::StationPlatform,
        crate::providers::mta::board::Arrival,
        crate::providers::mta::board::Direction,
    )),
    tags(
        (name = "arrivals", description = "Real-time arrivals aggregation"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        tracing::warn!("CORS: permissive mode explicitly enabled (all origins allowed) - DO NOT USE IN PRODUCTION");
        CorsLayer::permissive()
    } else if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS: restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        panic!("CORS configuration error: either set 'cors_origins' with allowed origins, or set 'cors_permissive: true' for development");
    };

    // Load the station directory once at startup; handlers read through the
    // shared store and treat an empty store as a per-request 500.
    let station_directory = StationDirectory::load(&config.stations_file)
        .expect("Failed to load station directory");
    tracing::info!(
        stations = station_directory.len(),
        file = %config.stations_file,
        "Loaded station directory"
    );
    let directory: DirectoryStore = Arc::new(RwLock::new(Some(station_directory)));

    let provider = Arc::new(
        MtaProvider::new(config.feeds.clone()).expect("Failed to initialize feed provider"),
    );

    // Build the app
    let app = Router::new()
        .merge(api::router(directory, provider))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!(addr = %config.bind_addr, "Trainboard API running");
    tracing::info!("Swagger UI: /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
