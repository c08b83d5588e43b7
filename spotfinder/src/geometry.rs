//! Geographic primitives used by the search engine.
//!
//! This module provides:
//! - `Coordinate`, a planar (x, y) pair where x is longitude and y is latitude
//! - `GeoPoint`, a validated geographic point
//! - great-circle distance on a spherical earth
//! - WKT `POINT` parsing for records coming back from a spatial store

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::errors::{SearchError, SearchResult};

/// Earth's mean radius in meters (WGS84)
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A 2D coordinate (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another coordinate.
    pub fn distance(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A geographic point with validated latitude and longitude coordinates.
///
/// Construction rejects non-finite values, latitudes outside [-90, 90] and
/// longitudes outside [-180, 180].
///
/// ## Coordinate Order
///
/// The constructor takes `(latitude, longitude)`. When converted to a planar
/// `Coordinate`, longitude becomes x and latitude becomes y.
///
/// ```rust
/// use spotfinder::GeoPoint;
///
/// let lisbon = GeoPoint::new(38.7223, -9.1393).unwrap();
/// assert_eq!(lisbon.latitude(), 38.7223);
/// assert_eq!(lisbon.to_coordinate().x, -9.1393);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = SearchError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Creates a new GeoPoint with validated geographic coordinates.
    ///
    /// # Errors
    /// Returns a validation error naming `latitude` or `longitude` if the
    /// value is not finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> SearchResult<Self> {
        Self::validate_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Creates a GeoPoint from a Coordinate.
    /// The coordinate's x value is treated as longitude, y as latitude.
    pub fn from_coordinate(coord: &Coordinate) -> SearchResult<Self> {
        Self::new(coord.y, coord.x)
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> SearchResult<()> {
        if !latitude.is_finite() {
            return Err(SearchError::validation(
                "latitude",
                format!("must be a finite number, got: {}", latitude),
            ));
        }
        if !longitude.is_finite() {
            return Err(SearchError::validation(
                "longitude",
                format!("must be a finite number, got: {}", longitude),
            ));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SearchError::validation(
                "latitude",
                format!("must be between -90 and 90 degrees, got: {}", latitude),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SearchError::validation(
                "longitude",
                format!("must be between -180 and 180 degrees, got: {}", longitude),
            ));
        }
        Ok(())
    }

    /// Gets the latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Gets the longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Converts to a Coordinate (x=longitude, y=latitude).
    pub fn to_coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }

    /// Calculates the great-circle distance to another GeoPoint in meters.
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Renders this point as WKT, longitude first.
    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.longitude, self.latitude)
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeoPoint(lat={:.6}, lon={:.6})",
            self.latitude, self.longitude
        )
    }
}

/// Calculates the great-circle distance between two points on a sphere
/// using the Haversine formula.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // clamp guards against a > 1 from rounding on antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Parses a WKT point such as `POINT(-9.1393 38.7223)` into a coordinate.
///
/// An optional `SRID=<n>;` prefix is accepted, as spatial databases emit it
/// for extended WKT.
pub fn parse_wkt_point(wkt: &str) -> SearchResult<Coordinate> {
    let wkt = wkt.trim();
    let wkt = match wkt.split_once(';') {
        Some((srid, rest)) if srid.trim_start().to_ascii_uppercase().starts_with("SRID=") => {
            rest.trim()
        }
        _ => wkt,
    };

    let rest = match wkt.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("POINT") => &wkt[5..],
        _ => {
            return Err(SearchError::store(format!(
                "Expected a WKT POINT, got: {}",
                wkt
            )))
        }
    };

    let body = rest
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| SearchError::store(format!("Malformed WKT point: {}", wkt)))?;

    let parts: Vec<&str> = body.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(SearchError::store(format!(
            "POINT must have exactly one coordinate pair: {}",
            wkt
        )));
    }
    let x: f64 = parts[0]
        .parse()
        .map_err(|_| SearchError::store(format!("Invalid x coordinate: {}", parts[0])))?;
    let y: f64 = parts[1]
        .parse()
        .map_err(|_| SearchError::store(format!("Invalid y coordinate: {}", parts[1])))?;
    Ok(Coordinate::new(x, y))
}
