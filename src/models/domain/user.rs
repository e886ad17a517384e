use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::domain::audit::{Audit, SoftDeletable};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// `salt$sha256(salt + password)`; the plain password is never stored.
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub audit: Audit,
}

impl User {
    pub fn new(
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: normalize_email(email),
            password_hash: hash_password(password),
            role,
            is_active: true,
            audit: Audit::new(actor, now),
        }
    }

    pub fn set_password(&mut self, password: &str) {
        self.password_hash = hash_password(password);
    }
}

impl SoftDeletable for User {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, actor: &str, now: DateTime<Utc>) {
        self.is_active = false;
        self.audit.touch(actor, now);
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
