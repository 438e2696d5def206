//! MTA real-time arrivals provider.
//!
//! Resolves a station's serving lines to the upstream feed bundles covering
//! them, fetches and decodes each bundle concurrently (failures isolated per
//! bundle), and runs the extracted stop-time updates through the arrivals
//! board pipeline. When nothing genuine survives, a clearly-flagged
//! synthetic board is produced instead.

pub mod board;
pub mod destinations;
pub mod error;
pub mod feeds;
pub mod jitter;
pub mod realtime;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::FeedConfig;
use crate::directory::Station;

use board::Arrival;
use error::FeedError;
use feeds::FeedBundle;
use jitter::{JitterSource, ThreadRngJitter};

/// The aggregated answer for one station, plus the diagnostic counters the
/// response carries.
#[derive(Debug, Clone)]
pub struct StationBoard {
    pub arrivals: Vec<Arrival>,
    /// Updates extracted across all bundles, before any filtering.
    pub raw_count: usize,
    /// Candidates surviving staleness filtering and deduplication.
    pub filtered_count: usize,
    /// Entries on the returned board, real or synthetic.
    pub final_count: usize,
    pub is_mock_data: bool,
}

struct CachedFeed {
    fetched_at: Instant,
    feed: Arc<gtfs_realtime::FeedMessage>,
}

pub struct MtaProvider {
    client: reqwest::Client,
    config: FeedConfig,
    jitter: Arc<dyn JitterSource>,
    cache: RwLock<HashMap<FeedBundle, CachedFeed>>,
}

impl MtaProvider {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("trainboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_jitter(client, config, Arc::new(ThreadRngJitter)))
    }

    /// Construct with an explicit randomness strategy (seedable in tests).
    pub fn with_jitter(
        client: reqwest::Client,
        config: FeedConfig,
        jitter: Arc<dyn JitterSource>,
    ) -> Self {
        Self {
            client,
            config,
            jitter,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Build the arrivals board for one station.
    ///
    /// Fetches every covering feed bundle concurrently; a bundle that fails
    /// to fetch or decode is logged and contributes nothing. This never
    /// fails as a whole: with zero usable updates the board is synthetic.
    pub async fn station_board(&self, station: &Station) -> StationBoard {
        let bundles: Vec<FeedBundle> =
            feeds::bundles_for_lines(station.lines.iter().map(String::as_str))
                .into_iter()
                .collect();

        let outcomes = future::join_all(bundles.iter().map(|b| self.feed_for(*b))).await;

        let platform_stop_ids: HashSet<String> = station
            .platforms
            .iter()
            .map(|p| p.stop_id.clone())
            .collect();

        let now = Utc::now().timestamp();

        let mut updates = Vec::new();
        for (bundle, outcome) in bundles.iter().zip(outcomes) {
            match outcome {
                Ok(feed) => {
                    updates.extend(realtime::extract_updates(&feed, &platform_stop_ids));
                }
                Err(e) => {
                    warn!(bundle = %bundle, error = %e, "Feed bundle unavailable, continuing without it");
                }
            }
        }

        self.assemble_board(station, updates, now)
    }

    fn assemble_board(
        &self,
        station: &Station,
        updates: Vec<realtime::RawUpdate>,
        now: i64,
    ) -> StationBoard {
        let raw_count = updates.len();

        let candidates: Vec<Arrival> = updates
            .into_iter()
            .filter_map(|u| board::resolve_arrival(u, now, self.jitter.as_ref()))
            .collect();

        let deduped = board::dedupe(candidates);
        let filtered_count = deduped.len();

        let capped = board::sort_and_cap(deduped);

        let (arrivals, is_mock_data) = if capped.is_empty() {
            debug!(station = %station.id, "No live updates survived, synthesizing board");
            (board::synthesize_board(station, now, self.jitter.as_ref()), true)
        } else {
            (capped, false)
        };

        StationBoard {
            final_count: arrivals.len(),
            raw_count,
            filtered_count,
            arrivals,
            is_mock_data,
        }
    }

    /// Fetch one bundle, serving a recent copy from the short-TTL cache when
    /// available. A TTL of zero disables caching entirely.
    async fn feed_for(&self, bundle: FeedBundle) -> Result<Arc<gtfs_realtime::FeedMessage>, FeedError> {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);

        if !ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(&bundle) {
                if cached.fetched_at.elapsed() < ttl {
                    return Ok(cached.feed.clone());
                }
            }
        }

        let feed = realtime::fetch_feed(
            &self.client,
            &bundle.url(),
            self.config.fetch_timeout_secs,
        )
        .await?;
        debug!(bundle = %bundle, entities = feed.entity.len(), "Fetched feed bundle");

        let feed = Arc::new(feed);
        if !ttl.is_zero() {
            let mut cache = self.cache.write().await;
            cache.insert(
                bundle,
                CachedFeed {
                    fetched_at: Instant::now(),
                    feed: feed.clone(),
                },
            );
        }

        Ok(feed)
    }
}
