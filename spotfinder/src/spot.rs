//! Spot data types.
//!
//! `SpotRecord` is the raw row a spatial store returns, with coordinates as
//! WKT text. `Spot` is the decoded point feature, and `RankedSpot` is a spot
//! paired with its distance from the search center.

use serde::{Deserialize, Serialize};

use crate::errors::{SearchError, SearchResult};
use crate::geometry::{parse_wkt_point, GeoPoint};

/// A point of interest as stored in a spatial store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    /// WKT point, longitude first.
    pub coordinates: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl SpotRecord {
    /// Decodes this record into a spot.
    ///
    /// # Errors
    /// Returns a store error when the coordinates are not a valid WKT point
    /// within geographic range.
    pub fn decode(&self) -> SearchResult<Spot> {
        let coord = parse_wkt_point(&self.coordinates).map_err(|e| {
            SearchError::store(format!("Cannot decode spot {}: {}", self.id, e.detail()))
        })?;
        let coordinates = GeoPoint::from_coordinate(&coord).map_err(|e| {
            SearchError::store(format!("Cannot decode spot {}: {}", self.id, e.detail()))
        })?;

        Ok(Spot {
            id: self.id.clone(),
            name: self.name.clone(),
            website: self.website.clone(),
            coordinates,
            description: self.description.clone(),
            rating: self.rating,
        })
    }
}

impl From<&Spot> for SpotRecord {
    fn from(spot: &Spot) -> Self {
        SpotRecord {
            id: spot.id.clone(),
            name: spot.name.clone(),
            website: spot.website.clone(),
            coordinates: spot.coordinates.to_wkt(),
            description: spot.description.clone(),
            rating: spot.rating,
        }
    }
}

/// A searchable point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub coordinates: GeoPoint,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

impl Spot {
    /// Creates a spot with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinates: GeoPoint) -> Self {
        Spot {
            id: id.into(),
            name: name.into(),
            website: None,
            coordinates,
            description: None,
            rating: None,
        }
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// A spot that matched a search, with its great-circle distance from the
/// search center rounded to centimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSpot {
    #[serde(flatten)]
    pub spot: Spot,
    pub distance_meters: f64,
}

impl RankedSpot {
    pub fn new(spot: Spot, distance_meters: f64) -> Self {
        RankedSpot {
            spot,
            distance_meters,
        }
    }

    pub fn id(&self) -> &str {
        &self.spot.id
    }

    pub fn rating(&self) -> Option<f64> {
        self.spot.rating
    }
}
