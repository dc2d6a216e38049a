//! Domain error types.
//!
//! These errors represent rider input that fails validation. They are
//! raised before any dataset lookup or network access happens.

/// Rider-supplied stop or direction could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// No stop code was given
    #[error("stop code must not be empty")]
    EmptyStopCode,

    /// Stop code contains characters that never appear in GTFS stop IDs
    #[error("malformed stop code {0:?}: expected letters and digits only (e.g. A27)")]
    MalformedStopCode(String),

    /// Direction was not North or South
    #[error("invalid direction {0:?}: expected N or S")]
    InvalidDirection(String),
}
