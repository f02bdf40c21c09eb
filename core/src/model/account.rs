use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AuthError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    pub salt: String,
    pub pin_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: String, pin: &str, created_at: DateTime<Utc>) -> Self {
        let salt = create_salt();
        let pin_hash = hash_pin(pin, &salt);
        Self {
            username,
            salt,
            pin_hash,
            created_at,
        }
    }

    pub fn verify_pin(&self, pin: &str) -> bool {
        hash_pin(pin, &self.salt) == self.pin_hash
    }
}

fn create_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Lowercase hex SHA-256 of `"{salt}:{pin}"`.
pub fn hash_pin(pin: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(pin.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

pub fn validate_username(username: &str) -> Result<(), AuthError> {
    let length_ok = (3..=32).contains(&username.len());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if length_ok && chars_ok {
        Ok(())
    } else {
        Err(AuthError::InvalidUsername)
    }
}

pub fn validate_pin(pin: &str) -> Result<(), AuthError> {
    if (4..=64).contains(&pin.chars().count()) {
        Ok(())
    } else {
        Err(AuthError::InvalidPin)
    }
}
