//! Geographic primitives: coordinates, distance formulas, and search bounding boxes.
//!
//! The default formula is a planar approximation: Euclidean distance in degrees
//! scaled by 111.32 km/degree. Haversine gives great-circle distances instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Kilometres per degree of arc at the equator, used by the planar formula.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// Widens bounding boxes so points sitting exactly on the radius survive
// floating-point rounding in the prefilter.
const BOX_EPSILON_DEGREES: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] naming `lat` or `lng`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SearchError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that both axes are finite and within decimal-degree bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] naming `lat` or `lng`.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SearchError::invalid(
                "lat",
                format!("{} is outside [-90, 90]", self.latitude),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SearchError::invalid(
                "lng",
                format!("{} is outside [-180, 180]", self.longitude),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceFormula {
    #[default]
    Planar,
    Haversine,
}

impl DistanceFormula {
    /// Distance in kilometres between `a` and `b`. Always `>= 0` and symmetric.
    #[must_use]
    pub fn distance_km(self, a: Coordinate, b: Coordinate) -> f64 {
        match self {
            Self::Planar => planar_km(a, b),
            Self::Haversine => haversine_km(a, b),
        }
    }
}

impl fmt::Display for DistanceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planar => write!(f, "planar"),
            Self::Haversine => write!(f, "haversine"),
        }
    }
}

impl FromStr for DistanceFormula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planar" => Ok(Self::Planar),
            "haversine" => Ok(Self::Haversine),
            other => Err(format!(
                "unknown distance formula '{other}'; expected 'planar' or 'haversine'"
            )),
        }
    }
}

/// Distance between two coordinates using the default planar formula.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    DistanceFormula::default().distance_km(a, b)
}

/// Longitude difference folded into `[0, 180]` so the antimeridian is not a cliff.
fn longitude_delta(a: f64, b: f64) -> f64 {
    let delta = (a - b).abs() % 360.0;
    if delta > 180.0 {
        360.0 - delta
    } else {
        delta
    }
}

fn planar_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = a.latitude - b.latitude;
    let d_lng = longitude_delta(a.longitude, b.longitude);
    d_lat.hypot(d_lng) * KM_PER_DEGREE
}

fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = longitude_delta(a.longitude, b.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Axis-aligned lat/lng box that contains every point within a radius of an origin.
///
/// Used as an index-friendly prefilter; exact distances are still computed for
/// every candidate inside the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn around(origin: Coordinate, radius_km: f64, formula: DistanceFormula) -> Self {
        let (lat_span, lng_span) = match formula {
            DistanceFormula::Planar => {
                let span = radius_km / KM_PER_DEGREE;
                (span, Some(span))
            }
            DistanceFormula::Haversine => {
                let angular = radius_km / EARTH_RADIUS_KM;
                let lat_span = angular.to_degrees();
                let reaches_pole = origin.latitude.abs() + lat_span >= 90.0;
                let lng_span = if reaches_pole || angular >= std::f64::consts::FRAC_PI_2 {
                    None
                } else {
                    let ratio = (angular.sin() / origin.latitude.to_radians().cos()).min(1.0);
                    Some(ratio.asin().to_degrees())
                };
                (lat_span, lng_span)
            }
        };

        let lat_span = lat_span + BOX_EPSILON_DEGREES;
        let min_lat = (origin.latitude - lat_span).max(-90.0);
        let max_lat = (origin.latitude + lat_span).min(90.0);

        let (min_lng, max_lng) = match lng_span {
            Some(span) => {
                let span = span + BOX_EPSILON_DEGREES;
                let lo = origin.longitude - span;
                let hi = origin.longitude + span;
                if lo < -180.0 || hi > 180.0 {
                    // Box would wrap the antimeridian; fall back to the full band.
                    (-180.0, 180.0)
                } else {
                    (lo, hi)
                }
            }
            None => (-180.0, 180.0),
        };

        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lng..=self.max_lng).contains(&point.longitude)
    }
}
