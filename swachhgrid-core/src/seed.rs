//! Demo bins placed around Manhattan landmarks, plus the demo accounts.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Bin, BinId, BinStatus, LocationType, NewUser, Role};
use crate::route::round_to;
use crate::status::predicted_full_time;

const LANDMARKS: [(&str, f64, f64); 10] = [
    ("Central Park", 40.7829, -73.9654),
    ("Times Square", 40.7580, -73.9855),
    ("Brooklyn Bridge", 40.7061, -73.9969),
    ("Empire State", 40.7484, -73.9857),
    ("Wall Street", 40.7074, -74.0113),
    ("Union Square", 40.7359, -73.9911),
    ("Grand Central", 40.7527, -73.9772),
    ("Columbus Circle", 40.7680, -73.9819),
    ("Washington Square", 40.7308, -73.9973),
    ("Bryant Park", 40.7536, -73.9832),
];

const DEMO_ACCOUNTS: [(&str, &str, &str, Role); 4] = [
    ("SwachhGrid Admin", "admin@swachhgrid.com", "admin123", Role::Admin),
    ("SwachhGrid User", "user@swachhgrid.com", "user123", Role::User),
    ("Demo Admin", "demo@admin.com", "demo123", Role::Admin),
    ("Demo User", "demo@user.com", "demo123", Role::User),
];

const CAPACITIES: [u32; 4] = [100, 150, 200, 300];
const JITTER_DEGREES: f64 = 0.002;

/// Generate one bin per landmark with random fill levels.
///
/// Coordinates are jittered slightly, and status and predicted-full time are derived
/// from the drawn fill level. The same seeded `rng` always yields the same bins.
pub fn demo_bins<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Vec<Bin> {
    LANDMARKS
        .iter()
        .zip(1..)
        .map(|(&(landmark, latitude, longitude), sequence)| {
            let lat_offset = rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES);
            let lng_offset = rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES);
            let fill_level = round_to(rng.gen_range(10.0..=95.0), 1);
            let capacity = CAPACITIES.choose(rng).copied().unwrap_or(100);
            let location_type = LocationType::ALL
                .choose(rng)
                .copied()
                .unwrap_or(LocationType::Street);

            Bin {
                id: BinId::from_sequence(sequence),
                name: format!("Bin-{sequence:03}"),
                latitude: latitude + lat_offset,
                longitude: longitude + lng_offset,
                capacity,
                fill_level,
                status: BinStatus::from_fill_level(fill_level),
                location_type,
                description: Some(format!("Waste bin at {landmark}")),
                last_updated: now,
                predicted_full_time: Some(predicted_full_time(fill_level, now, rng)),
            }
        })
        .collect()
}

/// Registration payloads for the well-known demo accounts.
#[must_use]
pub fn demo_users() -> Vec<NewUser> {
    DEMO_ACCOUNTS
        .iter()
        .map(|&(name, email, password, role)| NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            role,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn ten_consistent_bins() {
        let now = Utc::now();
        let bins = demo_bins(now, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(bins.len(), 10);

        for (bin, (landmark, latitude, longitude)) in bins.iter().zip(LANDMARKS) {
            assert_eq!(bin.status, BinStatus::from_fill_level(bin.fill_level));
            assert!((10.0..=95.0).contains(&bin.fill_level), "{}", bin.fill_level);
            assert!((bin.latitude - latitude).abs() <= JITTER_DEGREES + 1e-12);
            assert!((bin.longitude - longitude).abs() <= JITTER_DEGREES + 1e-12);
            assert!(CAPACITIES.contains(&bin.capacity));
            assert_eq!(
                bin.description.as_deref(),
                Some(format!("Waste bin at {landmark}").as_str())
            );
            assert!(bin.predicted_full_time.is_some_and(|eta| eta > now));
        }

        let first = bins.first().expect("ten bins");
        assert_eq!(first.id, BinId::from("bin-001"));
        assert_eq!(first.name, "Bin-001");
        let last = bins.last().expect("ten bins");
        assert_eq!(last.id, BinId::from("bin-010"));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let now = Utc::now();
        let first = demo_bins(now, &mut ChaCha8Rng::seed_from_u64(9));
        let second = demo_bins(now, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn demo_accounts_cover_both_roles() {
        let users = demo_users();
        assert_eq!(users.len(), 4);
        assert_eq!(
            users.iter().filter(|user| user.role == Role::Admin).count(),
            2
        );
        assert!(
            users.iter().any(|user| user.email == "admin@swachhgrid.com"),
            "admin account present"
        );
    }
}
