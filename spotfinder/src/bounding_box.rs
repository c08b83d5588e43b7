use serde::{Deserialize, Serialize};

use crate::geometry::Coordinate;

/// A 2D bounding box represented by minimum and maximum coordinates.
///
/// `BoundingBox` is the envelope of a search region. Containment checks use
/// it as a cheap first pass before the exact polygon test.
///
/// # Examples
///
/// ```rust
/// use spotfinder::BoundingBox;
///
/// let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
/// assert!(bbox.contains_point(50.0, 50.0));
/// assert!(bbox.contains_point(100.0, 0.0));
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoundingBox({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl BoundingBox {
    /// Creates a new bounding box with the specified coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Computes the envelope of a set of coordinates.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_coordinates(coords: &[Coordinate]) -> Option<BoundingBox> {
        let first = coords.first()?;
        let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
        for c in &coords[1..] {
            bbox.min_x = bbox.min_x.min(c.x);
            bbox.min_y = bbox.min_y.min(c.y);
            bbox.max_x = bbox.max_x.max(c.x);
            bbox.max_y = bbox.max_y.max(c.y);
        }
        Some(bbox)
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn expand(&self, margin: f64) -> BoundingBox {
        BoundingBox::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Checks if a point lies inside or on the edge of this box.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Checks if a coordinate lies inside or on the edge of this box.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        self.contains_point(coord.x, coord.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_display() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(bbox.to_string(), "BoundingBox(1, 2, 3, 4)");
    }

    #[test]
    fn test_from_coordinates() {
        let coords = vec![
            Coordinate::new(3.0, -1.0),
            Coordinate::new(-2.0, 5.0),
            Coordinate::new(0.0, 0.0),
        ];
        let bbox = BoundingBox::from_coordinates(&coords).unwrap();
        assert_eq!(bbox, BoundingBox::new(-2.0, -1.0, 3.0, 5.0));
        assert!(BoundingBox::from_coordinates(&[]).is_none());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains_point(0.0, 0.0));
        assert!(bbox.contains_point(10.0, 5.0));
        assert!(bbox.contains(&Coordinate::new(5.0, 10.0)));
        assert!(!bbox.contains_point(10.000001, 5.0));
        assert!(!bbox.contains_point(5.0, -0.1));
    }

    #[test]
    fn test_expand() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).expand(0.5);
        assert_eq!(bbox, BoundingBox::new(-0.5, -0.5, 1.5, 1.5));
    }
}
