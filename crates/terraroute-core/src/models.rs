//! Core data models for route computation.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// Conversion factor from kilometers to statute miles.
pub const MILES_PER_KM: f64 = 0.621371;
/// Conversion factor from kilometers to nautical miles.
pub const NM_PER_KM: f64 = 0.539957;

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, RouteError> {
        let coord = Self { lat, lng };
        coord.validate()?;
        Ok(coord)
    }

    /// Check latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn validate(&self) -> Result<(), RouteError> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(RouteError::InvalidInput(format!(
                "coordinate ({}, {}) is not finite",
                self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(RouteError::InvalidInput(format!(
                "latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(RouteError::InvalidInput(format!(
                "longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    pub(crate) fn same_position(&self, other: &Coordinate) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lng.to_bits() == other.lng.to_bits()
    }
}

/// Route length expressed in every unit the API reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distances {
    pub km: f64,
    pub miles: f64,
    pub nm: f64,
}

impl Distances {
    pub fn from_km(km: f64) -> Self {
        Self {
            km,
            miles: km * MILES_PER_KM,
            nm: km * NM_PER_KM,
        }
    }
}

/// Result of a distance/route computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Ordered waypoints, origin first and destination last.
    pub path: Vec<Coordinate>,
    pub distances: Distances,
    /// Spherical centroid of the path.
    pub midpoint: Coordinate,
}

/// A distance request between two airports identified by IATA code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub departure: String,
    pub destination: String,
    /// Country codes whose territory the route must not cross.
    #[serde(default)]
    pub borders: Vec<String>,
}
