//! Fetching and decoding of GTFS-RT feed bundles, and extraction of the
//! stop-time updates relevant to one station's platforms.

use std::collections::HashSet;

use prost::Message;
use tracing::debug;

use super::error::FeedError;

/// Maximum allowed protobuf response size (8 MB). Subway trip-update feeds
/// run well under 1 MB; anything larger is a misbehaving upstream.
const MAX_PROTOBUF_SIZE: usize = 8 * 1024 * 1024;

/// One stop-time report pulled out of a decoded feed, before any
/// staleness correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpdate {
    pub route_id: String,
    pub stop_id: String,
    pub trip_id: String,
    /// Arrival time if the upstream reported one, otherwise departure time.
    pub raw_epoch_seconds: i64,
}

/// Fetch and decode one GTFS-RT protobuf feed.
///
/// The timeout is per request so one slow upstream cannot stall the fan-out;
/// an elapsed timeout surfaces as a `reqwest` error like any other fetch
/// failure.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<gtfs_realtime::FeedMessage, FeedError> {
    let response = client
        .get(url)
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FeedError::UpstreamStatus(response.status()));
    }

    let bytes = response.bytes().await?;

    if bytes.len() > MAX_PROTOBUF_SIZE {
        return Err(FeedError::Oversized(bytes.len()));
    }

    gtfs_realtime::FeedMessage::decode(bytes.as_ref()).map_err(FeedError::from)
}

/// Pull out the stop-time updates matching the requesting station's
/// platform stop ids.
///
/// Entities without a trip update, without stop-time updates, or without
/// route/trip identifiers carry nothing a rider-facing board can use and
/// are skipped. A kept update's raw time is the arrival time if present,
/// else the departure time; candidates with neither are dropped.
pub fn extract_updates(
    feed: &gtfs_realtime::FeedMessage,
    platform_stop_ids: &HashSet<String>,
) -> Vec<RawUpdate> {
    let mut updates = Vec::new();

    for entity in &feed.entity {
        let Some(trip_update) = &entity.trip_update else {
            continue;
        };
        if trip_update.stop_time_update.is_empty() {
            continue;
        }
        let Some(route_id) = &trip_update.trip.route_id else {
            continue;
        };
        let Some(trip_id) = &trip_update.trip.trip_id else {
            continue;
        };

        for stu in &trip_update.stop_time_update {
            let Some(stop_id) = &stu.stop_id else {
                continue;
            };
            if !platform_stop_ids.contains(stop_id) {
                continue;
            }

            let raw = stu
                .arrival
                .as_ref()
                .and_then(|event| event.time)
                .or_else(|| stu.departure.as_ref().and_then(|event| event.time));
            let Some(raw_epoch_seconds) = raw else {
                continue;
            };

            updates.push(RawUpdate {
                route_id: route_id.clone(),
                stop_id: stop_id.clone(),
                trip_id: trip_id.clone(),
                raw_epoch_seconds,
            });
        }
    }

    debug!(
        entities = feed.entity.len(),
        extracted = updates.len(),
        "Extracted stop-time updates"
    );

    updates
}
