//! Search requests.

use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{SearchError, SearchResult};
use crate::geometry::GeoPoint;
use crate::region::ShapeKind;

/// A validated search: where to look, how far, and in what shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchRequest {
    center: GeoPoint,
    radius_meters: f64,
    shape: ShapeKind,
}

impl SearchRequest {
    /// Creates a request from a validated center.
    ///
    /// # Errors
    /// Returns a validation error naming `radius` unless the radius is finite
    /// and strictly positive.
    pub fn new(center: GeoPoint, radius_meters: f64, shape: ShapeKind) -> SearchResult<Self> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(SearchError::validation(
                "radius",
                format!("must be a positive number of meters, got: {}", radius_meters),
            ));
        }
        Ok(Self {
            center,
            radius_meters,
            shape,
        })
    }

    /// Creates a request from raw coordinates.
    pub fn from_coords(
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        shape: ShapeKind,
    ) -> SearchResult<Self> {
        let center = GeoPoint::new(latitude, longitude)?;
        Self::new(center, radius_meters, shape)
    }

    /// Parses a request from string parameters, as received in a query string.
    ///
    /// Expects `latitude`, `longitude`, `radius` and `shape`. Parameters are
    /// checked in that order and the first bad one is reported. Unknown keys
    /// are ignored; for repeated keys the first value wins.
    ///
    /// ```rust
    /// use spotfinder::{SearchRequest, ShapeKind};
    ///
    /// let request = SearchRequest::from_query([
    ///     ("latitude", "38.7223"),
    ///     ("longitude", "-9.1393"),
    ///     ("radius", "250"),
    ///     ("shape", "square"),
    /// ])
    /// .unwrap();
    /// assert_eq!(request.shape(), ShapeKind::Square);
    /// ```
    pub fn from_query<I, K, V>(params: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values: HashMap<String, String> = HashMap::new();
        for (key, value) in params {
            values
                .entry(key.as_ref().to_string())
                .or_insert_with(|| value.as_ref().to_string());
        }

        let latitude = parse_number(&values, "latitude")?;
        let longitude = parse_number(&values, "longitude")?;
        let radius = parse_number(&values, "radius")?;
        if radius <= 0.0 {
            return Err(SearchError::validation(
                "radius",
                format!("must be greater than zero, got: {}", radius),
            ));
        }
        let shape: ShapeKind = values
            .get("shape")
            .map(String::as_str)
            .unwrap_or_default()
            .parse()?;

        Self::from_coords(latitude, longitude, radius, shape)
    }

    pub fn center(&self) -> &GeoPoint {
        &self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }
}

fn parse_number(values: &HashMap<String, String>, name: &str) -> SearchResult<f64> {
    let raw = values
        .get(name)
        .ok_or_else(|| SearchError::validation(name, "missing"))?;
    let value: f64 = raw.trim().parse().map_err(|_| {
        SearchError::validation(name, format!("expected a number, got: {:?}", raw))
    })?;
    if !value.is_finite() {
        return Err(SearchError::validation(
            name,
            format!("must be a finite number, got: {}", raw),
        ));
    }
    Ok(value)
}
