//! Search configuration.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::errors::{SearchError, SearchResult};
use crate::region::{DEFAULT_QUADRANT_SEGMENTS, MAX_QUADRANT_SEGMENTS, MIN_QUADRANT_SEGMENTS};

/// Tuning for a [`SpotFinder`](crate::SpotFinder).
///
/// A cloneable handle over shared settings. Settings can only be changed
/// through [`SpotFinderBuilder`](crate::SpotFinderBuilder), so a finder's
/// configuration is fixed once it is built.
///
/// The near-band threshold and the meters-per-degree divisor are fixed and
/// not configurable.
#[derive(Clone)]
pub struct SpotFinderConfig {
    inner: Arc<SpotFinderConfigInner>,
}

impl Default for SpotFinderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotFinderConfig {
    /// Creates a configuration with default values.
    ///
    /// - quadrant segments: 8 (a 32-sided circle)
    pub fn new() -> Self {
        SpotFinderConfig {
            inner: Arc::new(SpotFinderConfigInner::new()),
        }
    }

    /// Number of segments per quadrant used to approximate circles.
    #[inline]
    pub fn quadrant_segments(&self) -> u32 {
        self.inner.quadrant_segments()
    }

    /// Sets the circle resolution.
    ///
    /// # Errors
    /// Returns a configuration error outside 8 to 1024.
    pub(crate) fn set_quadrant_segments(&self, segments: u32) -> SearchResult<()> {
        self.inner.set_quadrant_segments(segments)
    }
}

struct SpotFinderConfigInner {
    quadrant_segments: AtomicU32,
}

impl SpotFinderConfigInner {
    fn new() -> Self {
        Self {
            quadrant_segments: AtomicU32::new(DEFAULT_QUADRANT_SEGMENTS),
        }
    }

    fn quadrant_segments(&self) -> u32 {
        self.quadrant_segments.load(Ordering::Relaxed)
    }

    fn set_quadrant_segments(&self, segments: u32) -> SearchResult<()> {
        if !(MIN_QUADRANT_SEGMENTS..=MAX_QUADRANT_SEGMENTS).contains(&segments) {
            return Err(SearchError::Config(format!(
                "quadrant segments must be between {} and {}, got: {}",
                MIN_QUADRANT_SEGMENTS, MAX_QUADRANT_SEGMENTS, segments
            )));
        }
        self.quadrant_segments.store(segments, Ordering::Relaxed);
        Ok(())
    }
}
