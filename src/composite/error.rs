use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Malformed composite payload for {timestamp}")]
    GribDecode {
        timestamp: DateTime<Utc>,
        #[source]
        source: grib::GribError,
    },

    #[error("No precipitation field found in composite payload for {0}")]
    FieldNotFound(DateTime<Utc>),

    #[error("Unexpected composite grid size {found} for {timestamp} (expected {expected_national} or {expected_extended})")]
    GridSizeMismatch {
        timestamp: DateTime<Utc>,
        found: usize,
        expected_national: usize,
        expected_extended: usize,
    },
}
