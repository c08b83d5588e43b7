//! Search region construction.
//!
//! A search region is derived from a center, a radius in meters and a shape.
//! The radius is turned into degrees with a flat 111,320 meters per degree,
//! the same divisor at every latitude. This is exact only on the equator;
//! region membership depends on it, so it does not vary with latitude.
//!
//! Circles are approximated by a polygon with a fixed number of segments per
//! quadrant, the way spatial databases buffer a point. Squares are
//! axis-aligned and share the circle's angular radius as their half-width.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::bounding_box::BoundingBox;
use crate::errors::{SearchError, SearchResult};
use crate::geometry::{Coordinate, GeoPoint};

/// Meters per degree used to size search regions.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Segments per quadrant used for circle approximation unless configured.
pub const DEFAULT_QUADRANT_SEGMENTS: u32 = 8;

/// Fewest segments per quadrant a circle may be built with.
pub const MIN_QUADRANT_SEGMENTS: u32 = 8;

/// Most segments per quadrant a circle may be built with.
pub const MAX_QUADRANT_SEGMENTS: u32 = 1024;

/// Distance in degrees under which a point counts as lying on the boundary.
const BOUNDARY_TOLERANCE: f64 = 1e-12;

/// The shape of a search area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
        }
    }
}

impl Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(ShapeKind::Circle),
            "square" => Ok(ShapeKind::Square),
            other => Err(SearchError::validation(
                "shape",
                format!("valid values circle or square, got: {:?}", other),
            )),
        }
    }
}

/// Converts meters to degrees with the flat-earth divisor.
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// A closed planar region in geographic coordinates (x=longitude, y=latitude).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    shape: ShapeKind,
    center: GeoPoint,
    radius_degrees: f64,
    ring: Vec<Coordinate>,
    envelope: BoundingBox,
}

/// Builds the search region for a center, radius and shape.
///
/// Circles use [`DEFAULT_QUADRANT_SEGMENTS`] segments per quadrant.
///
/// # Errors
/// Returns a validation error naming `radius` when the radius is not a
/// finite, strictly positive number.
pub fn build_region(center: &GeoPoint, radius_meters: f64, shape: ShapeKind) -> SearchResult<Region> {
    build_region_with_segments(center, radius_meters, shape, DEFAULT_QUADRANT_SEGMENTS)
}

/// Builds the search region with an explicit circle resolution.
///
/// `quadrant_segments` is ignored for squares but still validated.
pub fn build_region_with_segments(
    center: &GeoPoint,
    radius_meters: f64,
    shape: ShapeKind,
    quadrant_segments: u32,
) -> SearchResult<Region> {
    if !radius_meters.is_finite() || radius_meters <= 0.0 {
        return Err(SearchError::validation(
            "radius",
            format!("must be a positive number of meters, got: {}", radius_meters),
        ));
    }
    if !(MIN_QUADRANT_SEGMENTS..=MAX_QUADRANT_SEGMENTS).contains(&quadrant_segments) {
        return Err(SearchError::validation(
            "quadrant_segments",
            format!(
                "must be between {} and {}, got: {}",
                MIN_QUADRANT_SEGMENTS, MAX_QUADRANT_SEGMENTS, quadrant_segments
            ),
        ));
    }

    let radius_degrees = meters_to_degrees(radius_meters);
    let origin = center.to_coordinate();
    let ring = match shape {
        ShapeKind::Circle => circle_ring(&origin, radius_degrees, quadrant_segments),
        ShapeKind::Square => square_ring(&origin, radius_degrees),
    };
    let envelope = BoundingBox::from_coordinates(&ring).unwrap_or_default();

    Ok(Region {
        shape,
        center: *center,
        radius_degrees,
        ring,
        envelope,
    })
}

/// Counter-clockwise ring starting due east, first vertex repeated last.
fn circle_ring(origin: &Coordinate, radius: f64, quadrant_segments: u32) -> Vec<Coordinate> {
    let total = 4 * quadrant_segments as usize;
    let step = FRAC_PI_2 / quadrant_segments as f64;
    let mut ring = Vec::with_capacity(total + 1);
    for k in 0..total {
        let angle = k as f64 * step;
        ring.push(Coordinate::new(
            origin.x + radius * angle.cos(),
            origin.y + radius * angle.sin(),
        ));
    }
    ring.push(ring[0]);
    ring
}

/// NE, NW, SW, SE, NE.
fn square_ring(origin: &Coordinate, half_width: f64) -> Vec<Coordinate> {
    let east = origin.x + half_width;
    let west = origin.x - half_width;
    let north = origin.y + half_width;
    let south = origin.y - half_width;
    vec![
        Coordinate::new(east, north),
        Coordinate::new(west, north),
        Coordinate::new(west, south),
        Coordinate::new(east, south),
        Coordinate::new(east, north),
    ]
}

impl Region {
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn center(&self) -> &GeoPoint {
        &self.center
    }

    /// The radius (or square half-width) in degrees.
    pub fn radius_degrees(&self) -> f64 {
        self.radius_degrees
    }

    /// The closed exterior ring. The first coordinate is repeated last.
    pub fn ring(&self) -> &[Coordinate] {
        &self.ring
    }

    pub fn envelope(&self) -> &BoundingBox {
        &self.envelope
    }

    /// Checks whether a point lies inside the region or on its boundary.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let coord = point.to_coordinate();
        if !self.envelope.expand(BOUNDARY_TOLERANCE).contains(&coord) {
            return false;
        }
        if on_boundary(&coord, &self.ring) {
            return true;
        }
        point_in_polygon(&coord, &self.ring)
    }

    /// Renders the region as a WKT polygon.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POLYGON((")?;
        for (i, c) in self.ring.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", c.x, c.y)?;
        }
        write!(f, "))")
    }
}

fn on_boundary(point: &Coordinate, ring: &[Coordinate]) -> bool {
    ring.windows(2)
        .any(|edge| distance_to_segment(point, &edge[0], &edge[1]) <= BOUNDARY_TOLERANCE)
}

fn distance_to_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance(&Coordinate::new(a.x + t * dx, a.y + t * dy))
}

/// Ray casting algorithm to determine if a point is inside a polygon.
fn point_in_polygon(point: &Coordinate, polygon: &[Coordinate]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;

    for i in 0..n {
        let xi = polygon[i].x;
        let yi = polygon[i].y;
        let xj = polygon[j].x;
        let yj = polygon[j].y;

        if ((yi > point.y) != (yj > point.y))
            && (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}
