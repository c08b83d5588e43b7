//! Spatial store collaborator.
//!
//! The search engine never holds on to a store connection. Every search opens
//! a [`StoreSession`], uses it for one evaluation pass, and drops it on every
//! exit path. A store only has to hand out sessions and return its raw
//! records; the containment predicate and the distance function have default
//! implementations that a database-backed store may override to push the
//! work into its own query engine.

use parking_lot::RwLock;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{SearchError, SearchResult};
use crate::geometry::GeoPoint;
use crate::region::Region;
use crate::spot::{Spot, SpotRecord};

/// A scoped, per-request view of a spatial store.
///
/// Dropping the session releases it.
pub trait StoreSession {
    /// Reads every stored point.
    fn records(&self) -> SearchResult<Vec<SpotRecord>>;

    /// Checks whether `point` lies within or on the boundary of `region`.
    fn contains(&self, region: &Region, point: &GeoPoint) -> SearchResult<bool> {
        Ok(region.contains(point))
    }

    /// Great-circle distance between two points in meters.
    fn distance_meters(&self, from: &GeoPoint, to: &GeoPoint) -> SearchResult<f64> {
        Ok(from.distance_meters(to))
    }
}

/// A source of spot data that hands out scoped sessions.
pub trait SpatialStore: Send + Sync {
    /// Opens a session for a single search.
    ///
    /// # Errors
    /// Returns a store error if the store is closed or unreachable.
    fn open_session(&self) -> SearchResult<Box<dyn StoreSession + '_>>;
}

impl<T: SpatialStore + ?Sized> SpatialStore for Arc<T> {
    fn open_session(&self) -> SearchResult<Box<dyn StoreSession + '_>> {
        (**self).open_session()
    }
}

/// An in-memory spatial store.
///
/// Records are kept as raw [`SpotRecord`]s and only decoded during a search,
/// so a malformed record surfaces as a store error at query time. The store
/// can be loaded from and saved to a JSON array of records.
///
/// ```rust
/// use spotfinder::{GeoPoint, MemorySpatialStore, Spot};
///
/// let store = MemorySpatialStore::new();
/// store.insert_spot(&Spot::new("1", "Kiosk", GeoPoint::new(38.72, -9.14).unwrap()));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemorySpatialStore {
    inner: Arc<MemorySpatialStoreInner>,
}

#[derive(Default)]
struct MemorySpatialStoreInner {
    records: RwLock<Vec<SpotRecord>>,
    open_sessions: AtomicUsize,
    closed: AtomicBool,
}

impl MemorySpatialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given raw records.
    pub fn from_records(records: Vec<SpotRecord>) -> Self {
        let store = Self::new();
        *store.inner.records.write() = records;
        store
    }

    /// Creates a store holding the given spots.
    pub fn from_spots<'a>(spots: impl IntoIterator<Item = &'a Spot>) -> Self {
        Self::from_records(spots.into_iter().map(SpotRecord::from).collect())
    }

    /// Loads a store from a JSON file containing an array of records.
    ///
    /// Records are not decoded here.
    pub fn load_json(path: impl AsRef<Path>) -> SearchResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading spots from {:?}", path);
        let file = File::open(path)?;
        let records: Vec<SpotRecord> = serde_json::from_reader(BufReader::new(file))?;
        log::debug!("Loaded {} spot records from {:?}", records.len(), path);
        Ok(Self::from_records(records))
    }

    /// Writes all records to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> SearchResult<()> {
        self.ensure_open()?;
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        let records = self.inner.records.read();
        serde_json::to_writer_pretty(&mut writer, &*records)?;
        writer.flush()?;
        Ok(())
    }

    pub fn insert_spot(&self, spot: &Spot) {
        self.insert_record(SpotRecord::from(spot));
    }

    /// Inserts a raw record as-is.
    pub fn insert_record(&self, record: SpotRecord) {
        self.inner.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.inner.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.records.write().clear();
    }

    /// Number of sessions currently open against this store.
    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(Ordering::SeqCst)
    }

    /// Closes the store. Sessions opened afterwards fail, and so do reads
    /// through sessions that are still open.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> SearchResult<()> {
        if self.is_closed() {
            return Err(SearchError::StoreClosed);
        }
        Ok(())
    }
}

impl SpatialStore for MemorySpatialStore {
    fn open_session(&self) -> SearchResult<Box<dyn StoreSession + '_>> {
        self.ensure_open()?;
        self.inner.open_sessions.fetch_add(1, Ordering::SeqCst);
        log::trace!("Opened memory store session");
        Ok(Box::new(MemorySession { store: &self.inner }))
    }
}

struct MemorySession<'a> {
    store: &'a MemorySpatialStoreInner,
}

impl StoreSession for MemorySession<'_> {
    fn records(&self) -> SearchResult<Vec<SpotRecord>> {
        if self.store.closed.load(Ordering::SeqCst) {
            return Err(SearchError::StoreClosed);
        }
        Ok(self.store.records.read().clone())
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        self.store.open_sessions.fetch_sub(1, Ordering::SeqCst);
        log::trace!("Released memory store session");
    }
}
