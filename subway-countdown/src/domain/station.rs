//! Stop code, direction and resolved station types.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InputError;
use super::line_group::LineGroupId;

/// A validated GTFS stop code such as `A27` or `101`.
///
/// Stop codes are non-empty ASCII alphanumerics. Input is trimmed and
/// normalized to uppercase, matching the published station list.
///
/// # Examples
///
/// ```
/// use subway_countdown::domain::StopCode;
///
/// let stop = StopCode::parse("a27").unwrap();
/// assert_eq!(stop.as_str(), "A27");
///
/// assert!(StopCode::parse("").is_err());
/// assert!(StopCode::parse("A 27").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopCode(String);

impl StopCode {
    /// Parse a stop code from rider input.
    pub fn parse(s: &str) -> Result<Self, InputError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InputError::EmptyStopCode);
        }

        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InputError::MalformedStopCode(s.to_string()));
        }

        Ok(StopCode(trimmed.to_ascii_uppercase()))
    }

    /// Returns the stop code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The platform key for this stop in the given direction.
    pub fn platform(&self, direction: Direction) -> PlatformKey {
        PlatformKey(format!("{}{}", self.0, direction.suffix()))
    }
}

impl TryFrom<String> for StopCode {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StopCode::parse(&value)
    }
}

impl From<StopCode> for String {
    fn from(code: StopCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.0)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Travel direction at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
}

impl Direction {
    /// Parse a direction, case-insensitively, from `N`, `S`, `North` or `South`.
    pub fn parse(s: &str) -> Result<Self, InputError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            _ => Err(InputError::InvalidDirection(s.to_string())),
        }
    }

    /// Suffix appended to a stop code in feed stop IDs.
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
        }
    }
}

impl FromStr for Direction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::parse(s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Platform-specific feed stop ID, e.g. `A27S`.
///
/// Uniquely identifies one platform within a trip update feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformKey(String);

impl PlatformKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a feed stop ID refers to this platform.
    pub fn matches(&self, stop_id: &str) -> bool {
        self.0 == stop_id
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A station resolved for one run.
///
/// Holds everything the feed pipeline needs to know about the rider's
/// platform. Never mutated after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub stop_code: StopCode,
    pub direction: Direction,
    /// Display name from the station list, e.g. "Rockaway Av".
    pub name: String,
    /// Feed partitions serving this stop. Never empty.
    pub line_groups: BTreeSet<LineGroupId>,
    /// Where trains in `direction` are headed, e.g. "Manhattan".
    #[serde(default)]
    pub direction_label: Option<String>,
}

impl Station {
    /// The platform key matched against trip update stop IDs.
    pub fn platform(&self) -> PlatformKey {
        self.stop_code.platform(self.direction)
    }

    /// Whether this station was resolved for the given stop and direction.
    pub fn is_for(&self, stop_code: &StopCode, direction: Direction) -> bool {
        &self.stop_code == stop_code && self.direction == direction
    }

    /// Whether any of this station's line groups carries `route_id`.
    pub fn serves_route(&self, route_id: &str) -> bool {
        self.line_groups.iter().any(|g| g.contains_code(route_id))
    }
}
