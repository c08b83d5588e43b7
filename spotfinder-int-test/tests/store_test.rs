use spotfinder::{
    GeoPoint, MemorySpatialStore, Region, SearchError, SearchResult, SpatialStore, SpotFinder,
    SpotRecord, StoreSession,
};
use spotfinder_int_test::test_util::{
    cleanup, create_test_context, ids, run_test, seed_spots, CENTER_LATITUDE, CENTER_LONGITUDE,
};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_store_loaded_from_file() {
    run_test(
        create_test_context,
        |ctx| {
            assert_eq!(ctx.store().len(), seed_spots().len());
            assert!(ctx.path().join("spots.json").exists());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_and_reload() {
    run_test(
        create_test_context,
        |ctx| {
            let file = ctx.path().join("copy.json");
            ctx.store().save_json(&file)?;

            let reloaded = MemorySpatialStore::load_json(&file)?;
            let finder = SpotFinder::new(reloaded);
            let original = ctx
                .finder()
                .search(CENTER_LATITUDE, CENTER_LONGITUDE, 500.0, "circle")?;
            let copy = finder.search(CENTER_LATITUDE, CENTER_LONGITUDE, 500.0, "circle")?;
            assert_eq!(original, copy);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_closed_store_fails_search() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.store().close();
            let err = ctx
                .finder()
                .search(CENTER_LATITUDE, CENTER_LONGITUDE, 500.0, "circle")
                .unwrap_err();
            assert!(err.is_store());
            assert!(!err.is_validation());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_record_fails_whole_search() {
    run_test(
        create_test_context,
        |ctx| {
            // the broken record lies far outside the search area; it still fails the search
            ctx.store().insert_record(SpotRecord {
                id: "broken".to_string(),
                name: "broken".to_string(),
                website: None,
                coordinates: "POINT(200 95)".to_string(),
                description: None,
                rating: None,
            });
            let err = ctx
                .finder()
                .search(CENTER_LATITUDE, CENTER_LONGITUDE, 500.0, "circle")
                .unwrap_err();
            assert!(err.is_store());
            assert!(err.to_string().contains("broken"));
            assert_eq!(ctx.store().open_sessions(), 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_file_is_store_error() {
    run_test(
        create_test_context,
        |ctx| {
            let file = ctx.path().join("broken.json");
            fs::write(&file, r#"[{"id": "x", "name": 3}]"#)?;
            let err = MemorySpatialStore::load_json(&file).err().expect("load fails");
            assert!(err.is_store());
            Ok(())
        },
        cleanup,
    )
}

/// A store that evaluates containment and distance itself, the way a
/// database would, and counts how often it is asked.
struct CountingStore {
    records: Vec<SpotRecord>,
    sessions: AtomicUsize,
    containment_checks: Arc<AtomicUsize>,
}

struct CountingSession<'a> {
    store: &'a CountingStore,
}

impl SpatialStore for CountingStore {
    fn open_session(&self) -> SearchResult<Box<dyn StoreSession + '_>> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSession { store: self }))
    }
}

impl StoreSession for CountingSession<'_> {
    fn records(&self) -> SearchResult<Vec<SpotRecord>> {
        Ok(self.store.records.clone())
    }

    fn contains(&self, region: &Region, point: &GeoPoint) -> SearchResult<bool> {
        self.store.containment_checks.fetch_add(1, Ordering::SeqCst);
        Ok(region.contains(point))
    }
}

impl Drop for CountingSession<'_> {
    fn drop(&mut self) {
        self.store.sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[test]
fn test_custom_store_predicates_are_used() {
    let checks = Arc::new(AtomicUsize::new(0));
    let store = Arc::new(CountingStore {
        records: seed_spots().iter().map(SpotRecord::from).collect(),
        sessions: AtomicUsize::new(0),
        containment_checks: checks.clone(),
    });
    let finder = SpotFinder::new(store.clone());

    let result = finder
        .search(CENTER_LATITUDE, CENTER_LONGITUDE, 100.0, "square")
        .expect("search succeeds");
    assert_eq!(ids(&result), vec!["cafe", "kiosk", "bookshop", "market"]);
    assert_eq!(checks.load(Ordering::SeqCst), seed_spots().len());
    assert_eq!(store.sessions.load(Ordering::SeqCst), 0);
}

struct UnreachableStore;

impl SpatialStore for UnreachableStore {
    fn open_session(&self) -> SearchResult<Box<dyn StoreSession + '_>> {
        Err(SearchError::store("connection refused"))
    }
}

#[test]
fn test_unreachable_store() {
    let finder = SpotFinder::new(UnreachableStore);
    let err = finder
        .search(CENTER_LATITUDE, CENTER_LONGITUDE, 100.0, "circle")
        .unwrap_err();
    assert!(err.is_store());

    // bad input is still reported as bad input
    let err = finder
        .search(CENTER_LATITUDE, CENTER_LONGITUDE, -1.0, "circle")
        .unwrap_err();
    assert!(err.is_validation());
}
