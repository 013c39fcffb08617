//! Fill-level derivation: status tiers, predicted-full estimates, and bin mutations.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::model::{Bin, BinId, BinStatus, BinUpdate, NewBin};

/// Fill level at which a bin turns critical.
pub const CRITICAL_THRESHOLD: f64 = 90.0;
/// Fill level at which a bin turns to warning.
pub const WARNING_THRESHOLD: f64 = 75.0;
/// Fill level from which a bin is put on the collection route.
pub const COLLECTION_THRESHOLD: f64 = WARNING_THRESHOLD;

const MIN_HOURS_TO_FULL: i64 = 2;
const MAX_HOURS_TO_FULL: i64 = 48;
const NEW_BIN_DAYS_TO_FULL: i64 = 7;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
/// Reasons a creation or update payload is rejected.
pub enum ValidationError {
    /// Name is empty or whitespace.
    #[error("bin name must not be blank")]
    BlankName,
    /// Latitude outside [-90, 90] or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude outside [-180, 180] or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    /// Capacity of zero.
    #[error("capacity must be positive")]
    ZeroCapacity,
    /// Fill level outside [0, 100] or not finite.
    #[error("fill level {0} is outside [0, 100]")]
    FillLevel(f64),
    /// Explicit status contradicts the fill level.
    #[error("status {requested} does not match fill level {fill_level} ({derived})")]
    StatusMismatch {
        /// Status sent by the caller.
        requested: BinStatus,
        /// Status implied by the fill level.
        derived: BinStatus,
        /// Fill level the status was derived from.
        fill_level: f64,
    },
    /// Account name is empty or whitespace.
    #[error("user name must not be blank")]
    BlankUserName,
    /// Email without a local part or domain.
    #[error("`{0}` is not an email address")]
    InvalidEmail(String),
    /// Password of zero length.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Another account already uses this email.
    #[error("a user with email {0} already exists")]
    EmailTaken(String),
}

impl BinStatus {
    /// Tier for a fill level: critical from 90, warning from 75, normal below.
    #[must_use]
    pub fn from_fill_level(fill_level: f64) -> Self {
        if fill_level >= CRITICAL_THRESHOLD {
            BinStatus::Critical
        } else if fill_level >= WARNING_THRESHOLD {
            BinStatus::Warning
        } else {
            BinStatus::Normal
        }
    }
}

/// Estimate when a bin will be full.
///
/// Critical bins are due within the hour; anything below gets a random 2 to 48 hour
/// horizon drawn from `rng`.
pub fn predicted_full_time<R: Rng>(
    fill_level: f64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> DateTime<Utc> {
    if fill_level >= CRITICAL_THRESHOLD {
        return now + Duration::hours(1);
    }
    let seconds = rng.gen_range(MIN_HOURS_TO_FULL * 3600..=MAX_HOURS_TO_FULL * 3600);
    now + Duration::seconds(seconds)
}

/// Build an empty bin from a creation payload.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the name is blank, the coordinates are out of
/// range, or the capacity is zero.
pub fn new_bin(id: BinId, payload: NewBin, now: DateTime<Utc>) -> Result<Bin, ValidationError> {
    validate_new_bin(&payload)?;

    Ok(Bin {
        id,
        name: payload.name.trim().to_owned(),
        latitude: payload.latitude,
        longitude: payload.longitude,
        capacity: payload.capacity,
        fill_level: 0.0,
        status: BinStatus::Normal,
        location_type: payload.location_type,
        description: payload.description,
        last_updated: now,
        predicted_full_time: Some(now + Duration::days(NEW_BIN_DAYS_TO_FULL)),
    })
}

/// Apply a partial update, re-deriving status and the full estimate.
///
/// The bin is left untouched when the update is rejected. `last_updated` is refreshed
/// on every accepted update, even an empty one.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the fill level is out of range or an explicit
/// status disagrees with the resulting fill level.
pub fn apply_update<R: Rng>(
    bin: &mut Bin,
    update: BinUpdate,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<(), ValidationError> {
    let fill_level = update.fill_level.unwrap_or(bin.fill_level);
    if !(0.0..=100.0).contains(&fill_level) {
        return Err(ValidationError::FillLevel(fill_level));
    }

    let derived = BinStatus::from_fill_level(fill_level);
    if let Some(requested) = update.status
        && requested != derived
    {
        return Err(ValidationError::StatusMismatch {
            requested,
            derived,
            fill_level,
        });
    }

    if update.fill_level.is_some() {
        bin.fill_level = fill_level;
        bin.status = derived;
        bin.predicted_full_time = Some(predicted_full_time(fill_level, now, rng));
    }
    if let Some(description) = update.description {
        bin.description = Some(description);
    }
    bin.last_updated = now;
    Ok(())
}

fn validate_new_bin(payload: &NewBin) -> Result<(), ValidationError> {
    if payload.name.trim().is_empty() {
        return Err(ValidationError::BlankName);
    }
    if !(-90.0..=90.0).contains(&payload.latitude) {
        return Err(ValidationError::Latitude(payload.latitude));
    }
    if !(-180.0..=180.0).contains(&payload.longitude) {
        return Err(ValidationError::Longitude(payload.longitude));
    }
    if payload.capacity == 0 {
        return Err(ValidationError::ZeroCapacity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::model::LocationType;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).single().expect("valid date")
    }

    fn payload() -> NewBin {
        NewBin {
            name: "Pier 17".to_owned(),
            latitude: 40.7061,
            longitude: -74.0017,
            capacity: 150,
            location_type: LocationType::Commercial,
            description: None,
        }
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(BinStatus::from_fill_level(92.0), BinStatus::Critical);
        assert_eq!(BinStatus::from_fill_level(90.0), BinStatus::Critical);
        assert_eq!(BinStatus::from_fill_level(89.9), BinStatus::Warning);
        assert_eq!(BinStatus::from_fill_level(80.0), BinStatus::Warning);
        assert_eq!(BinStatus::from_fill_level(75.0), BinStatus::Warning);
        assert_eq!(BinStatus::from_fill_level(74.9), BinStatus::Normal);
        assert_eq!(BinStatus::from_fill_level(50.0), BinStatus::Normal);
        assert_eq!(BinStatus::from_fill_level(0.0), BinStatus::Normal);
    }

    #[test]
    fn critical_bins_are_due_within_the_hour() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            predicted_full_time(95.0, now(), &mut rng),
            now() + Duration::hours(1)
        );
    }

    #[test]
    fn other_bins_get_a_two_to_forty_eight_hour_horizon() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for fill in [0.0, 40.0, 75.0, 89.9] {
            let eta = predicted_full_time(fill, now(), &mut rng);
            assert!(eta >= now() + Duration::hours(2), "{eta} too early");
            assert!(eta <= now() + Duration::hours(48), "{eta} too late");
        }
    }

    #[test]
    fn same_seed_gives_same_estimate() {
        let first = predicted_full_time(30.0, now(), &mut ChaCha8Rng::seed_from_u64(3));
        let second = predicted_full_time(30.0, now(), &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn new_bins_start_empty_and_due_in_a_week() {
        let bin = new_bin(BinId::from_sequence(11), payload(), now()).expect("valid payload");
        assert!(bin.fill_level.abs() < f64::EPSILON);
        assert_eq!(bin.status, BinStatus::Normal);
        assert_eq!(bin.predicted_full_time, Some(now() + Duration::days(7)));
        assert_eq!(bin.last_updated, now());
    }

    #[test]
    fn creation_rejects_bad_payloads() {
        let blank = NewBin {
            name: "  ".to_owned(),
            ..payload()
        };
        assert_eq!(new_bin(BinId::from("x"), blank, now()), Err(ValidationError::BlankName));

        let empty = NewBin {
            capacity: 0,
            ..payload()
        };
        assert_eq!(new_bin(BinId::from("x"), empty, now()), Err(ValidationError::ZeroCapacity));

        let north = NewBin {
            latitude: 91.0,
            ..payload()
        };
        assert_eq!(
            new_bin(BinId::from("x"), north, now()),
            Err(ValidationError::Latitude(91.0))
        );

        let nan = NewBin {
            longitude: f64::NAN,
            ..payload()
        };
        assert!(
            matches!(new_bin(BinId::from("x"), nan, now()), Err(ValidationError::Longitude(_))),
            "NaN longitude accepted"
        );
    }

    #[test]
    fn update_rederives_status() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut bin = new_bin(BinId::from("bin-001"), payload(), now()).expect("valid payload");
        let later = now() + Duration::minutes(10);

        apply_update(&mut bin, BinUpdate::fill_level(91.0), later, &mut rng).expect("accepted");
        assert_eq!(bin.status, BinStatus::Critical);
        assert_eq!(bin.predicted_full_time, Some(later + Duration::hours(1)));
        assert_eq!(bin.last_updated, later);

        apply_update(&mut bin, BinUpdate::fill_level(10.0), later, &mut rng).expect("accepted");
        assert_eq!(bin.status, BinStatus::Normal);
    }

    #[test]
    fn empty_update_still_touches_timestamp() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut bin = new_bin(BinId::from("bin-001"), payload(), now()).expect("valid payload");
        let later = now() + Duration::hours(3);

        apply_update(&mut bin, BinUpdate::default(), later, &mut rng).expect("accepted");
        assert_eq!(bin.last_updated, later);
        assert_eq!(bin.predicted_full_time, Some(now() + Duration::days(7)));
    }

    #[test]
    fn rejected_update_leaves_bin_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut bin = new_bin(BinId::from("bin-001"), payload(), now()).expect("valid payload");
        let before = bin.clone();

        let mismatch = BinUpdate {
            fill_level: Some(80.0),
            status: Some(BinStatus::Normal),
            description: Some("overflowing".to_owned()),
        };
        assert_eq!(
            apply_update(&mut bin, mismatch, now(), &mut rng),
            Err(ValidationError::StatusMismatch {
                requested: BinStatus::Normal,
                derived: BinStatus::Warning,
                fill_level: 80.0,
            })
        );
        assert_eq!(
            apply_update(&mut bin, BinUpdate::fill_level(120.0), now(), &mut rng),
            Err(ValidationError::FillLevel(120.0))
        );
        assert_eq!(bin, before);
    }

    #[test]
    fn matching_status_is_accepted() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut bin = new_bin(BinId::from("bin-001"), payload(), now()).expect("valid payload");
        let update = BinUpdate {
            fill_level: Some(78.0),
            status: Some(BinStatus::Warning),
            description: Some("lid jammed".to_owned()),
        };
        apply_update(&mut bin, update, now(), &mut rng).expect("accepted");
        assert_eq!(bin.status, BinStatus::Warning);
        assert_eq!(bin.description.as_deref(), Some("lid jammed"));
    }
}
