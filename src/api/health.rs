use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::directory::DirectoryStore;

#[derive(Clone)]
pub struct HealthState {
    pub directory: DirectoryStore,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service is running
    pub healthy: bool,
    /// Whether the station directory has been loaded into memory
    pub directory_loaded: bool,
    /// Number of stations in the loaded directory
    pub station_count: usize,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let directory_guard = state.directory.read().await;
    let (loaded, station_count) = match directory_guard.as_ref() {
        Some(directory) => (true, directory.len()),
        None => (false, 0),
    };

    Json(HealthResponse {
        healthy: true,
        directory_loaded: loaded,
        station_count,
    })
}

pub fn router(directory: DirectoryStore) -> Router {
    let state = HealthState { directory };
    Router::new().route("/", get(health_check)).with_state(state)
}
