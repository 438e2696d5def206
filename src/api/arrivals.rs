use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::api::error::{bad_request, internal_error, not_found, ApiError, ErrorResponse};
use crate::directory::{DirectoryStore, Station};
use crate::providers::mta::board::Arrival;
use crate::providers::mta::{MtaProvider, StationBoard};

#[derive(Clone)]
pub struct ArrivalsState {
    pub directory: DirectoryStore,
    pub provider: Arc<MtaProvider>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Diagnostic counters for one aggregation pass.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugCounters {
    pub raw_count: usize,
    pub filtered_count: usize,
    pub final_count: usize,
    pub is_mock_data: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsResponse {
    pub station: StationSummary,
    pub arrivals: Vec<Arrival>,
    pub last_updated: String,
    pub debug: DebugCounters,
}

/// Real-time arrivals board for one station, looked up by id or slug
#[utoipa::path(
    get,
    path = "/arrivals/{station_id}",
    params(
        ("station_id" = String, Path, description = "Station id or slug")
    ),
    responses(
        (status = 200, description = "Aggregated arrivals board", body = ArrivalsResponse),
        (status = 400, description = "Blank station id", body = ErrorResponse),
        (status = 404, description = "Unknown station", body = ErrorResponse),
        (status = 500, description = "Internal failure", body = ErrorResponse)
    ),
    tag = "arrivals"
)]
pub async fn get_station_arrivals(
    State(state): State<ArrivalsState>,
    Path(station_id): Path<String>,
) -> Result<Json<ArrivalsResponse>, ApiError> {
    let station_id = station_id.trim();
    if station_id.is_empty() {
        return Err(bad_request("Station ID is required"));
    }

    let directory_guard = state.directory.read().await;
    let Some(directory) = directory_guard.as_ref() else {
        error!("Station directory not loaded, cannot serve arrivals");
        return Err(internal_error("Failed to fetch arrival data"));
    };
    let Some(station) = directory.find(station_id) else {
        return Err(not_found("Station not found"));
    };

    let board = state.provider.station_board(station).await;
    Ok(Json(assemble_response(station, board)))
}

fn assemble_response(station: &Station, board: StationBoard) -> ArrivalsResponse {
    ArrivalsResponse {
        station: StationSummary {
            id: station.id.clone(),
            name: station.name.clone(),
            slug: station.slug.clone(),
        },
        arrivals: board.arrivals,
        last_updated: Utc::now().to_rfc3339(),
        debug: DebugCounters {
            raw_count: board.raw_count,
            filtered_count: board.filtered_count,
            final_count: board.final_count,
            is_mock_data: board.is_mock_data,
        },
    }
}

pub fn router(directory: DirectoryStore, provider: Arc<MtaProvider>) -> Router {
    let state = ArrivalsState {
        directory,
        provider,
    };
    Router::new()
        .route("/{station_id}", get(get_station_arrivals))
        .with_state(state)
}
