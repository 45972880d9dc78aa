//! Station metadata as served by the provider's catalog file.

use serde::{Deserialize, Serialize};

/// One forecast station from the provider catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// Provider station identifier (e.g. "10637").
    pub id: String,
    /// Human-readable station name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Elevation above sea level in meters, if reported.
    pub elevation: Option<i32>,
}
