//! Summary statistics over the bin collection.

use crate::model::{Bin, BinStatus, DashboardStats};
use crate::route::round_to;
use crate::status::COLLECTION_THRESHOLD;

impl DashboardStats {
    /// Fold the bins into per-tier counts, the mean fill level, and the collection count.
    ///
    /// An empty slice yields all zeros.
    #[must_use]
    pub fn from_bins(bins: &[Bin]) -> Self {
        let mut stats = DashboardStats::default();
        let mut fill_sum = 0.0;

        for bin in bins {
            stats.total_bins += 1;
            match bin.status {
                BinStatus::Critical => stats.critical_bins += 1,
                BinStatus::Warning => stats.warning_bins += 1,
                BinStatus::Normal => stats.normal_bins += 1,
            }
            if bin.fill_level >= COLLECTION_THRESHOLD {
                stats.bins_needing_collection += 1;
            }
            fill_sum += bin.fill_level;
        }

        if let Ok(count) = u32::try_from(stats.total_bins)
            && count > 0
        {
            stats.average_fill_level = round_to(fill_sum / f64::from(count), 1);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::{BinId, LocationType};

    fn bins(levels: &[f64]) -> Vec<Bin> {
        levels
            .iter()
            .zip(1..)
            .map(|(&fill_level, sequence)| Bin {
                id: BinId::from_sequence(sequence),
                name: format!("Bin-{sequence:03}"),
                latitude: 40.75,
                longitude: -73.98,
                capacity: 100,
                fill_level,
                status: BinStatus::from_fill_level(fill_level),
                location_type: LocationType::Park,
                description: None,
                last_updated: Utc::now(),
                predicted_full_time: None,
            })
            .collect()
    }

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(DashboardStats::from_bins(&[]), DashboardStats::default());
    }

    #[test]
    fn one_bin_per_tier() {
        let stats = DashboardStats::from_bins(&bins(&[50.0, 80.0, 95.0]));
        assert_eq!(stats.total_bins, 3);
        assert_eq!(stats.critical_bins, 1);
        assert_eq!(stats.warning_bins, 1);
        assert_eq!(stats.normal_bins, 1);
        assert!((stats.average_fill_level - 75.0).abs() < f64::EPSILON);
        assert_eq!(stats.bins_needing_collection, 2);
    }

    #[test]
    fn mean_is_rounded_to_one_decimal() {
        let stats = DashboardStats::from_bins(&bins(&[10.0, 20.0, 20.5]));
        assert!((stats.average_fill_level - 16.8).abs() < f64::EPSILON);
        assert_eq!(stats.bins_needing_collection, 0);
    }

    #[test]
    fn threshold_bins_need_collection() {
        let stats = DashboardStats::from_bins(&bins(&[75.0, 74.99, 90.0]));
        assert_eq!(stats.bins_needing_collection, 2);
        assert_eq!(stats.warning_bins, 1);
        assert_eq!(stats.critical_bins, 1);
    }
}
