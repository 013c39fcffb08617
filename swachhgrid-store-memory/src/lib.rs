//! Volatile store backend keeping bins, alerts, and accounts in insertion-ordered maps.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use swachhgrid_core::{
    credentials::UserRecord,
    model::{Alert, AlertId, Bin, BinId},
    ports::{BinStore, StoreError, UserStore},
};

/// In-memory [`BinStore`] and [`UserStore`]. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bins: RwLock<IndexMap<BinId, Bin>>,
    alerts: RwLock<IndexMap<AlertId, Alert>>,
    users: RwLock<IndexMap<String, UserRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with the given records, keeping their order.
    #[must_use]
    pub fn with_records(bins: Vec<Bin>, alerts: Vec<Alert>) -> Self {
        Self {
            bins: RwLock::new(bins.into_iter().map(|bin| (bin.id.clone(), bin)).collect()),
            alerts: RwLock::new(
                alerts
                    .into_iter()
                    .map(|alert| (alert.id.clone(), alert))
                    .collect(),
            ),
            users: RwLock::default(),
        }
    }
}

#[async_trait]
impl BinStore for MemoryStore {
    async fn all_bins(&self) -> Result<Vec<Bin>, StoreError> {
        Ok(self.bins.read().await.values().cloned().collect())
    }

    async fn bin(&self, id: &BinId) -> Result<Option<Bin>, StoreError> {
        Ok(self.bins.read().await.get(id).cloned())
    }

    async fn put_bin(&self, bin: Bin) -> Result<(), StoreError> {
        // `insert` keeps the original slot when the key already exists.
        self.bins.write().await.insert(bin.id.clone(), bin);
        Ok(())
    }

    async fn all_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.alerts.read().await.values().cloned().collect())
    }

    async fn alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError> {
        Ok(self.alerts.read().await.get(id).cloned())
    }

    async fn put_alert(&self, alert: Alert) -> Result<(), StoreError> {
        self.alerts.write().await.insert(alert.id.clone(), alert);
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn user_count(&self) -> Result<usize, StoreError> {
        Ok(self.users.read().await.len())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn put_user(&self, record: UserRecord) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(record.user.email.clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use swachhgrid_core::{
        credentials::PasswordDigest,
        model::{BinStatus, LocationType, Role, Severity, User, UserId},
    };

    use super::*;

    fn bin(id: &str, fill_level: f64) -> Bin {
        Bin {
            id: BinId::from(id),
            name: id.to_owned(),
            latitude: 40.75,
            longitude: -73.98,
            capacity: 120,
            fill_level,
            status: BinStatus::from_fill_level(fill_level),
            location_type: LocationType::Residential,
            description: None,
            last_updated: Utc::now(),
            predicted_full_time: None,
        }
    }

    #[tokio::test]
    async fn listing_keeps_insertion_order() {
        let store = MemoryStore::new();
        for id in ["bin-003", "bin-001", "bin-002"] {
            store.put_bin(bin(id, 10.0)).await.expect("memory put");
        }
        let ids: Vec<String> = store
            .all_bins()
            .await
            .expect("memory list")
            .into_iter()
            .map(|bin| bin.id.0)
            .collect();
        assert_eq!(ids, ["bin-003", "bin-001", "bin-002"]);
    }

    #[tokio::test]
    async fn replacing_keeps_position() {
        let store = MemoryStore::with_records(vec![bin("a", 10.0), bin("b", 20.0)], Vec::new());
        store.put_bin(bin("a", 95.0)).await.expect("memory put");

        let bins = store.all_bins().await.expect("memory list");
        let first = bins.first().expect("two bins");
        assert_eq!(first.id, BinId::from("a"));
        assert_eq!(first.status, BinStatus::Critical);
        assert_eq!(bins.len(), 2);
    }

    #[tokio::test]
    async fn missing_records_are_none() {
        let store = MemoryStore::new();
        assert_eq!(store.bin(&BinId::from("nope")).await.expect("memory get"), None);
        assert_eq!(store.alert(&AlertId::from("nope")).await.expect("memory get"), None);
    }

    #[tokio::test]
    async fn alerts_round_trip() {
        let store = MemoryStore::new();
        let alert = Alert {
            id: AlertId::from("alert-1"),
            message: "check".to_owned(),
            severity: Severity::High,
            bin_id: Some(BinId::from("bin-001")),
            created_at: Utc::now(),
            acknowledged: false,
        };
        store.put_alert(alert.clone()).await.expect("memory put");
        assert_eq!(
            store.alert(&alert.id).await.expect("memory get"),
            Some(alert)
        );
    }

    fn account(email: &str, password: &str) -> UserRecord {
        UserRecord {
            user: User {
                id: UserId::from_sequence(1),
                name: "Operator".to_owned(),
                email: email.to_owned(),
                role: Role::User,
                avatar: None,
                created_at: Utc::now(),
            },
            password: PasswordDigest::new(password, &mut ChaCha8Rng::seed_from_u64(5)),
        }
    }

    #[tokio::test]
    async fn verify_hashes_and_compares() {
        let store = MemoryStore::new();
        store
            .put_user(account("ops@swachhgrid.com", "user123"))
            .await
            .expect("memory put");

        let verified = store
            .verify("ops@swachhgrid.com", "user123")
            .await
            .expect("memory verify");
        assert_eq!(verified.map(|user| user.email), Some("ops@swachhgrid.com".to_owned()));
        assert_eq!(
            store
                .verify("ops@swachhgrid.com", "user124")
                .await
                .expect("memory verify"),
            None
        );
        assert_eq!(
            store
                .verify("ghost@swachhgrid.com", "user123")
                .await
                .expect("memory verify"),
            None
        );
        assert_eq!(store.user_count().await.expect("memory count"), 1);
    }
}
