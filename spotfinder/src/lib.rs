//! # Spotfinder - Proximity Search for Points of Interest
//!
//! This crate answers "what spots lie near this location" queries. Given a
//! center, a radius in meters and a search shape (circle or square), it
//! returns every stored spot inside the area, ordered so that nearby spots
//! come first and, among those, the best rated ones lead.
//!
//! ## Features
//!
//! - **Search Regions**: circles approximated as 32-sided polygons by default,
//!   or axis-aligned squares
//! - **Inclusive Containment**: spots on the region boundary match
//! - **Great-Circle Distances**: reported in meters, rounded to centimeters
//! - **Two-Tier Ranking**: spots under 50 m are ordered by rating, the rest
//!   by distance alone
//! - **Scoped Store Sessions**: one session per search, always released
//! - **Thread Safe**: a `SpotFinder` is cheap to clone and share
//!
//! ## Quick Start
//!
//! ```rust
//! use spotfinder::{GeoPoint, MemorySpatialStore, Spot, SpotFinder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemorySpatialStore::new();
//! store.insert_spot(&Spot::new("1", "Castle", GeoPoint::new(38.7139, -9.1334)?).with_rating(4.7));
//! store.insert_spot(&Spot::new("2", "Cathedral", GeoPoint::new(38.7098, -9.1335)?));
//!
//! let finder = SpotFinder::new(store);
//! let spots = finder.search(38.7120, -9.1340, 500.0, "circle")?;
//! for spot in &spots {
//!     println!("{} at {} m", spot.spot.name, spot.distance_meters);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod config;
pub mod errors;
pub mod finder;
pub mod geometry;
pub mod ranker;
pub mod region;
pub mod request;
pub mod spot;
pub mod store;

pub use bounding_box::BoundingBox;
pub use config::SpotFinderConfig;
pub use errors::{SearchError, SearchResult};
pub use finder::{SpotFinder, SpotFinderBuilder};
pub use geometry::{haversine_distance, parse_wkt_point, Coordinate, GeoPoint};
pub use ranker::{compare_ranked, order_ranked, rank, Band, NEAR_THRESHOLD_METERS};
pub use region::{
    build_region, build_region_with_segments, meters_to_degrees, Region, ShapeKind,
    MAX_QUADRANT_SEGMENTS, METERS_PER_DEGREE,
};
pub use request::SearchRequest;
pub use spot::{RankedSpot, Spot, SpotRecord};
pub use store::{MemorySpatialStore, SpatialStore, StoreSession};
