//! Stop code + direction → station resolution.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{Direction, LineGroupId, Station, StopCode};

use super::error::StationError;
use super::reference::StationReference;

/// Resolve rider input against the station list.
///
/// Input is validated before the dataset is consulted. A stop resolves only
/// if its row names the stop, lists at least one daytime line, and at least
/// one of those lines belongs to a known feed partition. Shuttles are
/// placed by the row's division.
pub fn resolve(
    stop_code: &str,
    direction: &str,
    reference: &StationReference,
) -> Result<Station, StationError> {
    let stop_code = StopCode::parse(stop_code)?;
    let direction = Direction::parse(direction)?;
    resolve_parsed(stop_code, direction, reference)
}

/// Resolve already-validated input.
pub fn resolve_parsed(
    stop_code: StopCode,
    direction: Direction,
    reference: &StationReference,
) -> Result<Station, StationError> {
    let not_found = || StationError::NotFound {
        stop_code: stop_code.to_string(),
    };

    let row = reference.find(stop_code.as_str()).ok_or_else(not_found)?;

    if row.stop_name.trim().is_empty() {
        return Err(not_found());
    }

    let codes = line_codes(&row.daytime_routes);
    let mut line_groups = BTreeSet::new();
    for code in &codes {
        let groups = LineGroupId::for_station_code(code, &row.division);
        if groups.is_empty() {
            debug!(stop = %stop_code, code = %code, "Ignoring line code with no feed");
        }
        line_groups.extend(groups);
    }

    if line_groups.is_empty() {
        return Err(not_found());
    }

    let direction_label = match direction {
        Direction::North => row.north_label.clone(),
        Direction::South => row.south_label.clone(),
    }
    .filter(|l| !l.trim().is_empty());

    Ok(Station {
        name: row.stop_name.trim().to_string(),
        stop_code,
        direction,
        line_groups,
        direction_label,
    })
}

/// Split a daytime routes column into lowercase, deduplicated codes.
fn line_codes(daytime_routes: &str) -> BTreeSet<String> {
    daytime_routes
        .split_whitespace()
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
