use spotfinder::geometry::EARTH_RADIUS_METERS;
use spotfinder::{GeoPoint, MemorySpatialStore, SearchError, SearchResult, Spot, SpotFinder, SpotRecord};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::{env, thread};
use std::time::Duration;

/// Latitude of the point all seeded spots are placed around.
pub const CENTER_LATITUDE: f64 = 38.7223;
/// Longitude of the point all seeded spots are placed around.
pub const CENTER_LONGITUDE: f64 = -9.1393;

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even if the test fails or panics; the first failure is
/// reported.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    B: Fn() -> SearchResult<TestContext>,
    T: Fn(TestContext) -> SearchResult<()>,
    A: Fn(TestContext) -> SearchResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    let after_result = after(ctx);

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic_err) => panic::resume_unwind(panic_err),
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    path: PathBuf,
    store: MemorySpatialStore,
    finder: SpotFinder,
}

impl TestContext {
    pub fn new(path: PathBuf, store: MemorySpatialStore) -> Self {
        let finder = SpotFinder::new(store.clone());
        Self {
            path,
            store,
            finder,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> MemorySpatialStore {
        self.store.clone()
    }

    pub fn finder(&self) -> SpotFinder {
        self.finder.clone()
    }
}

pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("spotfinder-{}", id))
}

pub fn center() -> GeoPoint {
    GeoPoint::new(CENTER_LATITUDE, CENTER_LONGITUDE).expect("valid center")
}

fn meters_per_degree() -> f64 {
    EARTH_RADIUS_METERS.to_radians()
}

/// A point `north` meters north and `east` meters east of `origin`.
///
/// Pure north/south offsets land at exactly that great-circle distance.
pub fn offset(origin: &GeoPoint, north: f64, east: f64) -> GeoPoint {
    let latitude = origin.latitude() + north / meters_per_degree();
    let longitude =
        origin.longitude() + east / (meters_per_degree() * origin.latitude().to_radians().cos());
    GeoPoint::new(latitude, longitude).expect("offset stays on the globe")
}

pub fn spot_at(id: &str, north: f64, rating: Option<f64>) -> Spot {
    let mut spot = Spot::new(id, id, offset(&center(), north, 0.0));
    spot.rating = rating;
    spot
}

/// The spots every test context starts with.
///
/// Distances from the center, in meters: kiosk 10, bookshop 30, cafe 40,
/// market 80, park 120, tower 150, harbour 2000.
pub fn seed_spots() -> Vec<Spot> {
    vec![
        spot_at("park", 120.0, Some(1.0)).with_website("https://park.example"),
        spot_at("kiosk", 10.0, Some(3.0)),
        spot_at("harbour", 2000.0, Some(5.0)),
        spot_at("bookshop", -30.0, None).with_description("second hand"),
        spot_at("market", -80.0, Some(8.0)),
        spot_at("cafe", 40.0, Some(9.0)),
        spot_at("tower", -150.0, None),
    ]
}

/// Creates a context whose store was loaded from a JSON file of the seed spots.
pub fn create_test_context() -> SearchResult<TestContext> {
    let path = random_path();
    fs::create_dir_all(&path)?;

    let records: Vec<SpotRecord> = seed_spots().iter().map(SpotRecord::from).collect();
    let file = path.join("spots.json");
    fs::write(&file, serde_json::to_vec_pretty(&records)?)?;

    let store = MemorySpatialStore::load_json(&file)?;
    Ok(TestContext::new(path, store))
}

/// Creates a context with an empty store.
pub fn create_empty_test_context() -> SearchResult<TestContext> {
    let path = random_path();
    fs::create_dir_all(&path)?;
    Ok(TestContext::new(path, MemorySpatialStore::new()))
}

/// Checks that no store session leaked, then removes the context directory.
pub fn cleanup(ctx: TestContext) -> SearchResult<()> {
    let open = ctx.store().open_sessions();
    if open != 0 {
        return Err(SearchError::store(format!("{} store sessions left open", open)));
    }

    let max_retries = 5;
    for retry in 0..max_retries {
        if !ctx.path().exists() {
            return Ok(());
        }
        match fs::remove_dir_all(ctx.path()) {
            Ok(_) => return Ok(()),
            Err(e) if retry < max_retries - 1 => {
                log::warn!("Retrying removal of {:?}: {}", ctx.path(), e);
                thread::sleep(Duration::from_millis(20 * (retry + 1) as u64));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Ids of a search result, in order.
pub fn ids(spots: &[spotfinder::RankedSpot]) -> Vec<String> {
    spots.iter().map(|s| s.id().to_string()).collect()
}
