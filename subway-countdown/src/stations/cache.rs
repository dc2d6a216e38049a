//! Disk cache for the rider's resolved station.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Station;

use super::error::StationError;

/// Saved stations are trusted for 30 days.
const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// On-disk form of the saved station.
#[derive(Debug, Serialize, Deserialize)]
struct SavedStation {
    saved_at: DateTime<Utc>,
    station: Station,
}

/// Where the station is saved and for how long it stays usable.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    pub path: PathBuf,
    pub ttl: Duration,
}

impl StationCacheConfig {
    /// Save to `path` with the default TTL.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// The rider's station, saved between runs so that later invocations can
/// skip the station list download.
#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    /// The saved station, unless the file is missing, unreadable, names no
    /// station, or is older than the TTL.
    pub fn load(&self) -> Option<Station> {
        self.load_at(Utc::now())
    }

    fn load_at(&self, now: DateTime<Utc>) -> Option<Station> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let saved: SavedStation = serde_json::from_str(&contents).ok()?;

        let age = now.signed_duration_since(saved.saved_at).to_std().ok()?;
        if age >= self.config.ttl {
            debug!(
                path = %self.config.path.display(),
                age_secs = age.as_secs(),
                "Saved station expired"
            );
            return None;
        }

        if saved.station.name.trim().is_empty() {
            debug!(path = %self.config.path.display(), "Saved station has no name");
            return None;
        }

        Some(saved.station)
    }

    /// Write `station` with the current time, creating the directory.
    pub fn save(&self, station: &Station) -> Result<(), StationError> {
        let saved = SavedStation {
            saved_at: Utc::now(),
            station: station.clone(),
        };

        if let Some(dir) = self.config.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir).map_err(|e| StationError::Cache {
                message: format!("cannot create {}: {e}", dir.display()),
            })?;
        }

        let json = serde_json::to_string_pretty(&saved).map_err(|e| StationError::Cache {
            message: format!("cannot serialize station: {e}"),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| StationError::Cache {
            message: format!("cannot write {}: {e}", self.config.path.display()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }
}
