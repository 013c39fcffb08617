//! Alert derivation from a snapshot of bins.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::model::{Alert, AlertId, Bin, BinStatus, Severity};

const SYSTEM_STATUS_MESSAGE: &str = "System Status: All collection routes optimized for today";

/// Derive one alert per critical or warning bin, then the daily system alert.
///
/// Alerts follow the order of `bins` and are numbered `alert-1`, `alert-2`, … starting
/// at `first_sequence`. Critical bins yield [`Severity::Critical`], warning bins
/// [`Severity::High`]. The trailing system alert is [`Severity::Low`] and already
/// acknowledged. Backdated creation times are drawn from `rng`.
pub fn derive_alerts<R: Rng>(
    bins: &[Bin],
    first_sequence: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(bins.len() + 1);
    let mut sequence = first_sequence;

    for bin in bins {
        let Some(alert) = bin_alert(bin, AlertId::from_sequence(sequence), now, rng) else {
            continue;
        };
        alerts.push(alert);
        sequence += 1;
    }

    alerts.push(Alert {
        id: AlertId::from_sequence(sequence),
        message: SYSTEM_STATUS_MESSAGE.to_owned(),
        severity: Severity::Low,
        bin_id: None,
        created_at: now - Duration::hours(2),
        acknowledged: true,
    });

    alerts
}

fn bin_alert<R: Rng>(bin: &Bin, id: AlertId, now: DateTime<Utc>, rng: &mut R) -> Option<Alert> {
    let (severity, message, minutes_ago) = match bin.status {
        BinStatus::Critical => (
            Severity::Critical,
            format!(
                "CRITICAL: Bin {} is {:.1}% full and needs immediate collection!",
                bin.name, bin.fill_level
            ),
            rng.gen_range(5..=60),
        ),
        BinStatus::Warning => (
            Severity::High,
            format!(
                "WARNING: Bin {} is {:.1}% full and should be collected soon.",
                bin.name, bin.fill_level
            ),
            rng.gen_range(30..=120),
        ),
        BinStatus::Normal => return None,
    };

    Some(Alert {
        id,
        message,
        severity,
        bin_id: Some(bin.id.clone()),
        created_at: now - Duration::minutes(minutes_ago),
        acknowledged: false,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::model::{BinId, LocationType};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid date")
    }

    fn bin(id: &str, fill_level: f64) -> Bin {
        Bin {
            id: BinId::from(id),
            name: id.to_uppercase(),
            latitude: 40.75,
            longitude: -73.98,
            capacity: 200,
            fill_level,
            status: BinStatus::from_fill_level(fill_level),
            location_type: LocationType::Street,
            description: None,
            last_updated: now(),
            predicted_full_time: None,
        }
    }

    #[test]
    fn only_system_alert_for_calm_bins() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let alerts = derive_alerts(&[bin("bin-001", 12.0)], 1, now(), &mut rng);
        assert_eq!(alerts.len(), 1);
        let system = alerts.first().expect("system alert");
        assert_eq!(system.severity, Severity::Low);
        assert!(system.acknowledged, "system alert should be pre-acknowledged");
        assert_eq!(system.bin_id, None);
        assert_eq!(system.id, AlertId::from("alert-1"));
    }

    #[test]
    fn severities_follow_bin_order_with_system_last() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let bins = [bin("bin-001", 95.0), bin("bin-002", 40.0), bin("bin-003", 80.0)];
        let alerts = derive_alerts(&bins, 1, now(), &mut rng);

        let summary: Vec<_> = alerts
            .iter()
            .map(|alert| (alert.id.0.as_str(), alert.severity, alert.bin_id.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("alert-1", Severity::Critical, Some(BinId::from("bin-001"))),
                ("alert-2", Severity::High, Some(BinId::from("bin-003"))),
                ("alert-3", Severity::Low, None),
            ]
        );
        assert!(
            alerts.iter().all(|alert| alert.severity != Severity::Medium),
            "medium is never derived"
        );
    }

    #[test]
    fn messages_name_the_bin_and_fill_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let alerts = derive_alerts(&[bin("bin-004", 92.5)], 1, now(), &mut rng);
        let critical = alerts.first().expect("critical alert");
        assert_eq!(
            critical.message,
            "CRITICAL: Bin BIN-004 is 92.5% full and needs immediate collection!"
        );
        assert!(!critical.acknowledged, "bin alerts start unacknowledged");
        assert!(critical.created_at <= now() - Duration::minutes(5));
        assert!(critical.created_at >= now() - Duration::minutes(60));
    }

    #[test]
    fn whole_fill_levels_keep_one_decimal() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let alerts = derive_alerts(&[bin("bin-001", 90.0), bin("bin-002", 80.0)], 1, now(), &mut rng);
        let messages: Vec<_> = alerts.iter().map(|alert| alert.message.as_str()).collect();
        assert_eq!(
            messages.get(..2),
            Some(
                &[
                    "CRITICAL: Bin BIN-001 is 90.0% full and needs immediate collection!",
                    "WARNING: Bin BIN-002 is 80.0% full and should be collected soon.",
                ][..]
            )
        );
    }

    #[test]
    fn numbering_can_continue_an_existing_sequence() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let alerts = derive_alerts(&[bin("bin-001", 77.0)], 8, now(), &mut rng);
        let ids: Vec<_> = alerts.iter().map(|alert| alert.id.0.as_str()).collect();
        assert_eq!(ids, ["alert-8", "alert-9"]);
    }
}
