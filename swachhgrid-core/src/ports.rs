//! Traits describing the persistence and credential boundaries and their error type.

use async_trait::async_trait;

use crate::credentials::UserRecord;
use crate::model::{Alert, AlertId, Bin, BinId, User};

#[derive(thiserror::Error, Debug)]
/// Errors raised by a store backend.
pub enum StoreError {
    /// Backend is not reachable or refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// Backend failed in an unexpected way.
    #[error("Store backend error: {0}")]
    Backend(String),
}

#[async_trait]
/// Keyed persistence for bins and alerts.
///
/// Listing returns records in insertion order. `put_*` inserts a new record or
/// replaces the one with the same id in place. Implementations make no durability,
/// atomicity, or isolation promises to the caller.
pub trait BinStore: Send + Sync {
    /// Every bin, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn all_bins(&self) -> Result<Vec<Bin>, StoreError>;

    /// Look up a single bin.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails. A missing bin is `Ok(None)`.
    async fn bin(&self, id: &BinId) -> Result<Option<Bin>, StoreError>;

    /// Insert or replace a bin.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn put_bin(&self, bin: Bin) -> Result<(), StoreError>;

    /// Every alert, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn all_alerts(&self) -> Result<Vec<Alert>, StoreError>;

    /// Look up a single alert.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails. A missing alert is `Ok(None)`.
    async fn alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError>;

    /// Insert or replace an alert.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn put_alert(&self, alert: Alert) -> Result<(), StoreError>;
}

#[async_trait]
/// Credential store: accounts keyed by normalized email.
///
/// Passwords are only ever held as salted digests; [`UserStore::verify`] hashes the
/// candidate password and compares it against the stored digest.
pub trait UserStore: Send + Sync {
    /// Number of registered accounts.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn user_count(&self) -> Result<usize, StoreError>;

    /// Look up an account by its normalized email.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails. An unknown email is `Ok(None)`.
    async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert or replace the account with the record's email.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn put_user(&self, record: UserRecord) -> Result<(), StoreError>;

    /// The account for `email` when `password` matches its digest.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails. An unknown email and a wrong
    /// password are both `Ok(None)`.
    async fn verify(&self, email: &str, password: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .user_by_email(email)
            .await?
            .filter(|record| record.password.matches(password))
            .map(|record| record.user))
    }
}
