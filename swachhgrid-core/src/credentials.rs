//! Salted password digests and account validation for the credential store.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::model::{NewUser, User, UserId};
use crate::status::ValidationError;

const SALT_LEN: usize = 16;

/// Salted SHA-256 digest of a password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

impl PasswordDigest {
    /// Hash `password` under a fresh salt drawn from `rng`.
    pub fn new<R: Rng>(password: &str, rng: &mut R) -> Self {
        let mut salt = [0_u8; SALT_LEN];
        rng.fill(salt.as_mut_slice());
        Self {
            digest: digest(&salt, password),
            salt,
        }
    }

    /// Whether `password` hashes to the stored digest.
    #[must_use]
    pub fn matches(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.digest
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("PasswordDigest").finish_non_exhaustive()
    }
}

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize()
        .into()
}

/// A stored account: the public user plus its password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Public view of the account.
    pub user: User,
    /// Digest checked on login.
    pub password: PasswordDigest,
}

/// Canonical form used as the lookup key for an email.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Build a stored account from a registration payload.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the name is blank, the email is malformed, or the
/// password is empty.
pub fn new_user<R: Rng>(
    id: UserId,
    payload: NewUser,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<UserRecord, ValidationError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankUserName);
    }

    let email = normalize_email(&payload.email);
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
        && !email.contains(char::is_whitespace);
    if !well_formed {
        return Err(ValidationError::InvalidEmail(payload.email));
    }

    if payload.password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }

    Ok(UserRecord {
        user: User {
            id,
            name: name.to_owned(),
            email,
            role: payload.role,
            avatar: None,
            created_at: now,
        },
        password: PasswordDigest::new(&payload.password, rng),
    })
}
