//! The search entry point.
//!
//! `SpotFinder` ties the pieces together for one request at a time:
//! validate the request, build the region, open a store session, rank, and
//! release the session. It keeps no per-request state, so a single finder
//! can be cloned and shared across threads freely.

use std::sync::Arc;

use crate::config::SpotFinderConfig;
use crate::errors::{SearchError, SearchResult};
use crate::ranker::rank;
use crate::region::{build_region_with_segments, ShapeKind};
use crate::request::SearchRequest;
use crate::spot::RankedSpot;
use crate::store::SpatialStore;

/// Answers "what spots lie near this location" queries against a store.
///
/// # Examples
///
/// ```rust
/// use spotfinder::{GeoPoint, MemorySpatialStore, Spot, SpotFinder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemorySpatialStore::new();
/// store.insert_spot(&Spot::new("1", "Kiosk", GeoPoint::new(38.7223, -9.1393)?).with_rating(4.0));
///
/// let finder = SpotFinder::new(store);
/// let spots = finder.search(38.7223, -9.1393, 100.0, "circle")?;
/// assert_eq!(spots.len(), 1);
/// assert_eq!(spots[0].distance_meters, 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SpotFinder {
    inner: Arc<SpotFinderInner>,
}

struct SpotFinderInner {
    store: Box<dyn SpatialStore>,
    config: SpotFinderConfig,
}

impl SpotFinder {
    /// Creates a finder over `store` with default configuration.
    pub fn new(store: impl SpatialStore + 'static) -> Self {
        SpotFinder {
            inner: Arc::new(SpotFinderInner {
                store: Box::new(store),
                config: SpotFinderConfig::new(),
            }),
        }
    }

    /// Returns a builder for a finder with custom configuration.
    pub fn builder() -> SpotFinderBuilder {
        SpotFinderBuilder::new()
    }

    pub fn config(&self) -> &SpotFinderConfig {
        &self.inner.config
    }

    /// Runs a validated search request.
    ///
    /// A store session is opened for this call only and released before
    /// returning, whether the search succeeds or fails.
    ///
    /// # Errors
    /// Validation errors are raised before the store is contacted. Store
    /// errors fail the whole search; no partial results are returned.
    pub fn find_spots(&self, request: &SearchRequest) -> SearchResult<Vec<RankedSpot>> {
        let region = build_region_with_segments(
            request.center(),
            request.radius_meters(),
            request.shape(),
            self.inner.config.quadrant_segments(),
        )?;
        log::debug!(
            "Searching {} within {} m of {} ({} degrees)",
            request.shape(),
            request.radius_meters(),
            request.center(),
            region.radius_degrees()
        );

        let session = self.inner.store.open_session()?;
        let result = rank(request.center(), &region, session.as_ref());
        if let Err(e) = &result {
            log::warn!("Spot search failed: {}", e);
        }
        result
    }

    /// Searches around a raw latitude/longitude with a shape given by name
    /// (`circle` or `square`).
    pub fn search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        shape: &str,
    ) -> SearchResult<Vec<RankedSpot>> {
        let shape: ShapeKind = shape.parse()?;
        let request = SearchRequest::from_coords(latitude, longitude, radius_meters, shape)?;
        self.find_spots(&request)
    }

    /// Searches with string parameters as received in a query string.
    ///
    /// See [`SearchRequest::from_query`].
    pub fn search_query<I, K, V>(&self, params: I) -> SearchResult<Vec<RankedSpot>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request = SearchRequest::from_query(params)?;
        self.find_spots(&request)
    }
}

/// Builder for a [`SpotFinder`].
///
/// Errors raised while configuring are held back and returned from
/// [`build`](SpotFinderBuilder::build).
///
/// ```rust
/// use spotfinder::{MemorySpatialStore, SpotFinder};
///
/// let finder = SpotFinder::builder()
///     .store(MemorySpatialStore::new())
///     .quadrant_segments(16)
///     .build()
///     .unwrap();
/// assert_eq!(finder.config().quadrant_segments(), 16);
/// ```
#[derive(Default)]
pub struct SpotFinderBuilder {
    error: Option<SearchError>,
    store: Option<Box<dyn SpatialStore>>,
    config: SpotFinderConfig,
}

impl SpotFinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spatial store to search.
    pub fn store(mut self, store: impl SpatialStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Sets the number of segments per quadrant used for circles.
    pub fn quadrant_segments(mut self, segments: u32) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_quadrant_segments(segments) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Builds the finder.
    ///
    /// # Errors
    /// Returns the first configuration error, or a configuration error if no
    /// store was set.
    pub fn build(self) -> SearchResult<SpotFinder> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let store = self
            .store
            .ok_or_else(|| SearchError::Config("no spatial store configured".to_string()))?;
        Ok(SpotFinder {
            inner: Arc::new(SpotFinderInner {
                store,
                config: self.config,
            }),
        })
    }
}
