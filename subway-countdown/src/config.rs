//! Per-user data directory layout.

use std::path::{Path, PathBuf};

/// Directory name created under the platform data directory.
const APP_DIR: &str = "mta_times";

const API_KEY_FILE: &str = "mta_api_key.txt";
const STATION_FILE: &str = "mta_local_station.json";
const SNAPSHOT_FILE: &str = "mta_times.json";

/// Where the key file, station cache and report snapshot live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Use `root` directly.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `root` if given, otherwise `mta_times` under the platform data
    /// directory, falling back to the working directory.
    pub fn resolve(root: Option<PathBuf>) -> Self {
        match root {
            Some(root) => Self::new(root),
            None => {
                let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
                path.push(APP_DIR);
                Self::new(path)
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn api_key(&self) -> PathBuf {
        self.root.join(API_KEY_FILE)
    }

    pub fn station_cache(&self) -> PathBuf {
        self.root.join(STATION_FILE)
    }

    pub fn snapshot(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }
}
