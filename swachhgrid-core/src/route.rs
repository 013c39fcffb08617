//! Collection tour over the bins that need pickup.
//!
//! The tour is built greedily: start at the first bin needing collection, then keep
//! driving to the closest bin not yet visited. This is a nearest-neighbor
//! approximation, not an exact travelling-salesman solution.

use tracing::debug;

use crate::geo::haversine_km;
use crate::model::{Bin, RouteOptimization};
use crate::status::COLLECTION_THRESHOLD;

/// Average truck speed used for the time estimate.
pub const AVERAGE_SPEED_KMH: f64 = 30.0;
/// Time spent emptying one bin.
pub const MINUTES_PER_STOP: f64 = 5.0;

/// Plan a collection tour over every bin at or above the collection threshold.
///
/// Bins below the threshold are skipped; when none qualify the empty route is returned.
/// On equal distances the candidate encountered first in `bins` wins.
#[must_use]
pub fn optimize(bins: &[Bin]) -> RouteOptimization {
    let mut remaining: Vec<&Bin> = bins
        .iter()
        .filter(|bin| bin.fill_level >= COLLECTION_THRESHOLD)
        .collect();

    if remaining.is_empty() {
        debug!("no bins need collection");
        return RouteOptimization::default();
    }

    let mut tour = Vec::with_capacity(remaining.len());
    let mut current = remaining.remove(0);
    let mut total_distance = 0.0;
    tour.push(current);

    while let Some((index, distance)) = nearest(current, &remaining) {
        total_distance += distance;
        current = remaining.remove(index);
        tour.push(current);
    }

    let estimated_time = estimated_minutes(total_distance, tour.len());
    debug!(
        stops = tour.len(),
        total_distance, estimated_time, "planned collection route"
    );

    RouteOptimization {
        bin_ids: tour.iter().map(|bin| bin.id.clone()).collect(),
        total_distance: round_to(total_distance, 2),
        estimated_time: round_to(estimated_time, 1),
        coordinates: tour
            .iter()
            .map(|bin| [bin.latitude, bin.longitude])
            .collect(),
    }
}

/// Driving time at [`AVERAGE_SPEED_KMH`] plus [`MINUTES_PER_STOP`] per bin.
#[must_use]
pub fn estimated_minutes(distance_km: f64, stops: usize) -> f64 {
    let stops = u32::try_from(stops).unwrap_or(u32::MAX);
    distance_km / AVERAGE_SPEED_KMH * 60.0 + f64::from(stops) * MINUTES_PER_STOP
}

/// Index and distance of the closest candidate; the first one wins ties.
fn nearest(from: &Bin, candidates: &[&Bin]) -> Option<(usize, f64)> {
    let origin = from.coordinates();
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let distance = haversine_km(origin, candidate.coordinates());
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((index, distance));
        }
    }
    best
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
