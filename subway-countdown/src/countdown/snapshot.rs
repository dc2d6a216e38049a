//! Last-known countdown written to disk for other programs to read.

use std::path::{Path, PathBuf};

use crate::domain::Report;

use super::error::CountdownError;

/// JSON file holding the latest non-empty report as `[[minutes, "route"], ...]`.
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    path: PathBuf,
}

impl ReportSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Overwrite the snapshot with `report`. Empty reports leave the previous
    /// snapshot in place and return `false`.
    pub fn save(&self, report: &Report) -> Result<bool, CountdownError> {
        if report.is_empty() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| CountdownError::io("failed to create snapshot directory", e))?;
        }

        let json = render_pairs(report);
        std::fs::write(&self.path, json)
            .map_err(|e| CountdownError::io("failed to write report snapshot", e))?;
        Ok(true)
    }

    /// Read back the stored `(minutes, route)` pairs, if any.
    pub fn load(&self) -> Option<Vec<(u32, String)>> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The report as a compact JSON array of `[minutes, "route"]` pairs.
pub fn render_pairs(report: &Report) -> String {
    // Tuples of u32 and &str always serialize.
    serde_json::to_string(&report.pairs()).unwrap_or_else(|_| "[]".to_string())
}
