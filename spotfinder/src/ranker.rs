//! Proximity ranking.
//!
//! Every stored point is evaluated against the search region and measured
//! from the search center. Points outside the region are dropped. The rest
//! are ordered in two tiers:
//!
//! 1. spots closer than [`NEAR_THRESHOLD_METERS`] come first, best rated
//!    first, unrated after rated, then nearest first;
//! 2. all other spots follow, nearest first. Their rating plays no part.
//!
//! Containment runs against the planar region, while the reported distance is
//! the great-circle distance.

use std::cmp::Ordering;

use crate::errors::{SearchError, SearchResult};
use crate::geometry::GeoPoint;
use crate::region::Region;
use crate::spot::RankedSpot;
use crate::store::StoreSession;

/// Spots strictly closer than this many meters are in the near band.
pub const NEAR_THRESHOLD_METERS: f64 = 50.0;

/// Ranking band of a matched spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Near,
    Far,
}

impl Band {
    /// Classifies a distance in meters.
    pub fn of(distance_meters: f64) -> Band {
        if distance_meters < NEAR_THRESHOLD_METERS {
            Band::Near
        } else {
            Band::Far
        }
    }
}

/// Rounds a distance to two decimal places, halves away from zero.
pub fn round_to_centimeters(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}

/// Evaluates every record of the session against `region` and returns the
/// matches in ranking order.
///
/// # Errors
/// Any failing store call or undecodable record fails the whole ranking;
/// partial results are never returned.
pub fn rank(
    center: &GeoPoint,
    region: &Region,
    session: &dyn StoreSession,
) -> SearchResult<Vec<RankedSpot>> {
    let records = session.records()?;
    let total = records.len();

    let mut matches = Vec::new();
    for record in &records {
        let spot = record.decode()?;
        if !session.contains(region, &spot.coordinates)? {
            continue;
        }

        let distance = session.distance_meters(center, &spot.coordinates)?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(SearchError::store(format!(
                "Invalid distance {} for spot {}",
                distance, spot.id
            )));
        }
        matches.push(RankedSpot::new(spot, round_to_centimeters(distance)));
    }

    order_ranked(&mut matches);
    log::debug!(
        "Ranked {} of {} spots ({} near)",
        matches.len(),
        total,
        matches
            .iter()
            .filter(|m| Band::of(m.distance_meters) == Band::Near)
            .count()
    );
    Ok(matches)
}

/// Sorts already evaluated spots into ranking order.
///
/// The sort is stable, so entries that tie on every key keep their input
/// order.
pub fn order_ranked(spots: &mut [RankedSpot]) {
    spots.sort_by(compare_ranked);
}

/// Total order used for ranking.
pub fn compare_ranked(a: &RankedSpot, b: &RankedSpot) -> Ordering {
    let band = Band::of(a.distance_meters);
    band.cmp(&Band::of(b.distance_meters))
        .then_with(|| match band {
            Band::Near => compare_rating_desc(a.rating(), b.rating()),
            Band::Far => Ordering::Equal,
        })
        .then_with(|| a.distance_meters.total_cmp(&b.distance_meters))
}

// higher first, missing last; -0.0 and 0.0 tie
fn compare_rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => (y + 0.0).total_cmp(&(x + 0.0)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
