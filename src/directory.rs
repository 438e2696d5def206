//! Read-only station directory collaborator.
//!
//! The directory is owned by the wider site; this service consumes a JSON
//! export of it, loaded once at startup into an explicitly constructed
//! repository that is injected into the request handlers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// One physical platform/direction pairing at a station.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationPlatform {
    pub stop_id: String,
    pub direction: String,
    pub lines: Vec<String>,
}

/// A station record as exported by the directory service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub borough: String,
    pub lines: Vec<String>,
    pub platforms: Vec<StationPlatform>,
}

/// In-memory directory with id and slug lookup.
#[derive(Debug)]
pub struct StationDirectory {
    stations: Vec<Station>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl StationDirectory {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DirectoryError::ReadError(e.to_string()))?;
        let stations: Vec<Station> = serde_json::from_str(&content)
            .map_err(|e| DirectoryError::ParseError(e.to_string()))?;
        Ok(Self::from_stations(stations))
    }

    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_slug = HashMap::new();
        for (index, station) in stations.iter().enumerate() {
            by_id.insert(station.id.clone(), index);
            by_slug.insert(station.slug.clone(), index);
        }
        Self {
            stations,
            by_id,
            by_slug,
        }
    }

    /// Look a station up by id or, failing that, by slug.
    pub fn find(&self, key: &str) -> Option<&Station> {
        self.by_id
            .get(key)
            .or_else(|| self.by_slug.get(key))
            .map(|&index| &self.stations[index])
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Shared handle the handlers read through; `None` until the startup load
/// has completed, which the request path surfaces as a 500.
pub type DirectoryStore = Arc<RwLock<Option<StationDirectory>>>;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read station directory: {0}")]
    ReadError(String),
    #[error("failed to parse station directory: {0}")]
    ParseError(String),
}
