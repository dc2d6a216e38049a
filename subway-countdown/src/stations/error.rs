//! Station resolution error types.

use crate::domain::InputError;

/// Published list of valid GTFS stop IDs.
pub const STATION_LIST_URL: &str = "https://atisdata.s3.amazonaws.com/Station/Stations.csv";

/// Errors that can occur when resolving a station.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Stop code or direction failed validation
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// No serviceable row for the stop code
    #[error(
        "no station with service found for stop ID {stop_code}; \
         for a list of stop IDs, check {STATION_LIST_URL}"
    )]
    NotFound { stop_code: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Station list is not valid CSV
    #[error("station list parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StationError::from(InputError::InvalidDirection("E".into()));
        assert_eq!(
            err.to_string(),
            "invalid input: invalid direction \"E\": expected N or S"
        );

        let err = StationError::NotFound {
            stop_code: "Z99".into(),
        };
        assert!(err.to_string().contains("stop ID Z99"));
        assert!(err.to_string().contains(STATION_LIST_URL));

        let err = StationError::Cache {
            message: "disk full".into(),
        };
        assert_eq!(err.to_string(), "cache error: disk full");
    }
}
