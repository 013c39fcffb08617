//! High-level service facade over the stores, derivers, and route planner.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::alerts::derive_alerts;
use crate::credentials::{self, normalize_email};
use crate::model::{
    Alert, AlertId, Bin, BinId, BinUpdate, DashboardStats, DemoSummary, NewBin, NewUser,
    RouteOptimization, User, UserId,
};
use crate::notify::{Notification, NotificationHub, NotificationReceiver};
use crate::ports::{BinStore, StoreError, UserStore};
use crate::route;
use crate::seed::{demo_bins, demo_users};
use crate::status::{self, ValidationError};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced to clients of [`SwachhService`].
pub enum ServiceError {
    /// No bin with this id.
    #[error("Bin not found: {0}")]
    BinNotFound(BinId),
    /// No alert with this id.
    #[error("Alert not found: {0}")]
    AlertNotFound(AlertId),
    /// No account with this email.
    #[error("User not found: {0}")]
    UserNotFound(String),
    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// Payload was rejected.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
    /// Deriving or writing initial data failed.
    #[error("Internal error: {0}")]
    Internal(String),
    /// Store backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Public entry point for bins, alerts, accounts, dashboard figures, and routing.
///
/// Mutations run one at a time under a write guard, from the first store read to the
/// last store write.
pub struct SwachhService {
    store: Arc<dyn BinStore>,
    users: Arc<dyn UserStore>,
    notifications: NotificationHub,
    writes: Mutex<()>,
    rng: Mutex<ChaCha8Rng>,
}

impl SwachhService {
    /// Create a service over the bin `store` and credential store `users`, drawing
    /// estimates and salts from a generator seeded with `seed`.
    #[must_use]
    pub fn new(store: Arc<dyn BinStore>, users: Arc<dyn UserStore>, seed: u64) -> Self {
        Self {
            store,
            users,
            notifications: NotificationHub::new(),
            writes: Mutex::new(()),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Create a service over one backend that keeps both bins and accounts.
    #[must_use]
    pub fn with_store<S>(store: Arc<S>, seed: u64) -> Self
    where
        S: BinStore + UserStore + 'static,
    {
        let bins: Arc<dyn BinStore> = Arc::<S>::clone(&store);
        Self::new(bins, store, seed)
    }

    /// Listen for changes made through this service.
    pub fn subscribe(&self) -> NotificationReceiver {
        self.notifications.subscribe()
    }

    /// Seed the stores with demo bins, the alerts derived from them, and the demo
    /// accounts that are not registered yet.
    ///
    /// Alerts are derived once here; later bin updates do not raise or clear alerts.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Internal`] when the data cannot be written.
    pub async fn initialize_demo_data(&self) -> Result<DemoSummary, ServiceError> {
        let _guard = self.writes.lock().await;
        let now = Utc::now();
        let (bins, alerts) = {
            let mut rng = self.rng.lock().await;
            let bins = demo_bins(now, &mut *rng);
            let alerts = derive_alerts(&bins, 1, now, &mut *rng);
            (bins, alerts)
        };

        let bins_count = bins.len();
        let alerts_count = alerts.len();

        for bin in bins {
            self.store.put_bin(bin).await.map_err(|err| {
                ServiceError::Internal(format!("failed to store demo bin: {err}"))
            })?;
        }
        for alert in alerts {
            self.store.put_alert(alert).await.map_err(|err| {
                ServiceError::Internal(format!("failed to store demo alert: {err}"))
            })?;
        }

        let mut users_count = 0;
        for payload in demo_users() {
            let known = self
                .users
                .user_by_email(&normalize_email(&payload.email))
                .await
                .map_err(|err| {
                    ServiceError::Internal(format!("failed to look up demo user: {err}"))
                })?;
            if known.is_some() {
                continue;
            }
            self.insert_user(payload, now).await.map_err(|err| {
                ServiceError::Internal(format!("failed to store demo user: {err}"))
            })?;
            users_count += 1;
        }

        let summary = DemoSummary {
            bins_count,
            alerts_count,
            users_count,
        };
        info!(
            bins = summary.bins_count,
            alerts = summary.alerts_count,
            users = summary.users_count,
            "demo data initialized"
        );
        self.notifications
            .publish(&Notification::DemoDataInitialized(summary));
        Ok(summary)
    }

    /// All bins in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store fails.
    pub async fn list_bins(&self) -> Result<Vec<Bin>, ServiceError> {
        Ok(self.store.all_bins().await?)
    }

    /// A single bin.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BinNotFound`] for an unknown id, or
    /// [`ServiceError::Store`] when the store fails.
    pub async fn get_bin(&self, id: &BinId) -> Result<Bin, ServiceError> {
        self.store
            .bin(id)
            .await?
            .ok_or_else(|| ServiceError::BinNotFound(id.clone()))
    }

    /// Register an empty bin under the next free `bin-NNN` id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for a malformed payload, or
    /// [`ServiceError::Store`] when the store fails.
    pub async fn create_bin(&self, payload: NewBin) -> Result<Bin, ServiceError> {
        // Held from the id scan until the bin is written.
        let _guard = self.writes.lock().await;
        let existing = self.store.all_bins().await?;
        let taken: HashSet<&BinId> = existing.iter().map(|bin| &bin.id).collect();
        let id = (existing.len() + 1..)
            .map(BinId::from_sequence)
            .find(|candidate| !taken.contains(candidate))
            .ok_or_else(|| ServiceError::Internal("bin id space exhausted".to_owned()))?;

        let bin = status::new_bin(id, payload, Utc::now()).inspect_err(|err| {
            warn!(%err, "rejected new bin");
        })?;
        self.store.put_bin(bin.clone()).await?;

        info!(id = %bin.id, name = %bin.name, "bin created");
        self.notifications
            .publish(&Notification::BinCreated(bin.clone()));
        Ok(bin)
    }

    /// Apply a partial update and refresh the bin's timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BinNotFound`] for an unknown id,
    /// [`ServiceError::Validation`] for an out-of-range fill level or contradicting
    /// status, or [`ServiceError::Store`] when the store fails.
    pub async fn update_bin(&self, id: &BinId, update: BinUpdate) -> Result<Bin, ServiceError> {
        let _guard = self.writes.lock().await;
        let mut bin = self.get_bin(id).await?;
        {
            let mut rng = self.rng.lock().await;
            status::apply_update(&mut bin, update, Utc::now(), &mut *rng).inspect_err(|err| {
                warn!(%id, %err, "rejected bin update");
            })?;
        }
        self.store.put_bin(bin.clone()).await?;

        info!(%id, fill_level = bin.fill_level, status = %bin.status, "bin updated");
        self.notifications
            .publish(&Notification::BinUpdated(bin.clone()));
        Ok(bin)
    }

    /// All alerts in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store fails.
    pub async fn list_alerts(&self) -> Result<Vec<Alert>, ServiceError> {
        Ok(self.store.all_alerts().await?)
    }

    /// Mark an alert as seen. Acknowledging twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AlertNotFound`] for an unknown id, or
    /// [`ServiceError::Store`] when the store fails.
    pub async fn acknowledge_alert(&self, id: &AlertId) -> Result<Alert, ServiceError> {
        let _guard = self.writes.lock().await;
        let mut alert = self
            .store
            .alert(id)
            .await?
            .ok_or_else(|| ServiceError::AlertNotFound(id.clone()))?;

        if alert.acknowledged {
            debug!(%id, "alert already acknowledged");
            return Ok(alert);
        }

        alert.acknowledged = true;
        self.store.put_alert(alert.clone()).await?;

        info!(%id, "alert acknowledged");
        self.notifications
            .publish(&Notification::AlertAcknowledged(alert.clone()));
        Ok(alert)
    }

    /// Summary figures over the current bins.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let bins = self.store.all_bins().await?;
        let stats = DashboardStats::from_bins(&bins);
        debug!(?stats, "computed dashboard stats");
        Ok(stats)
    }

    /// Nearest-neighbor collection tour over the bins needing pickup.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store fails.
    pub async fn optimize_route(&self) -> Result<RouteOptimization, ServiceError> {
        let bins = self.store.all_bins().await?;
        Ok(route::optimize(&bins))
    }

    /// Register an account. Emails are unique, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for a malformed payload or an email that is
    /// already registered, or [`ServiceError::Store`] when the store fails.
    pub async fn register_user(&self, payload: NewUser) -> Result<User, ServiceError> {
        let _guard = self.writes.lock().await;
        let email = normalize_email(&payload.email);
        if self.users.user_by_email(&email).await?.is_some() {
            warn!(%email, "rejected duplicate registration");
            return Err(ValidationError::EmailTaken(email).into());
        }

        let user = self.insert_user(payload, Utc::now()).await?;
        info!(id = %user.id, email = %user.email, role = %user.role, "user registered");
        Ok(user)
    }

    /// Check a password against the stored digest.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidCredentials`] for an unknown email or a wrong
    /// password, or [`ServiceError::Store`] when the store fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = normalize_email(email);
        let Some(user) = self.users.verify(&email, password).await? else {
            warn!(%email, "login rejected");
            return Err(ServiceError::InvalidCredentials);
        };
        debug!(id = %user.id, "login accepted");
        Ok(user)
    }

    /// The account registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UserNotFound`] for an unknown email, or
    /// [`ServiceError::Store`] when the store fails.
    pub async fn user_by_email(&self, email: &str) -> Result<User, ServiceError> {
        let email = normalize_email(email);
        match self.users.user_by_email(&email).await? {
            Some(record) => Ok(record.user),
            None => Err(ServiceError::UserNotFound(email)),
        }
    }

    /// Validate, hash, and store a new account. Callers hold the write guard.
    async fn insert_user(
        &self,
        payload: NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, ServiceError> {
        let id = UserId::from_sequence(self.users.user_count().await? + 1);
        let record = {
            let mut rng = self.rng.lock().await;
            credentials::new_user(id, payload, now, &mut *rng).inspect_err(|err| {
                warn!(%err, "rejected new user");
            })?
        };
        let user = record.user.clone();
        self.users.put_user(record).await?;
        Ok(user)
    }
}
