//! Serialized document tree held by the local store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::crypto::PasswordDigest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Documents {
    /// Users keyed by uid.
    pub users: BTreeMap<String, UserDocument>,
}

impl Documents {
    pub fn user_by_email(&self, email: &str) -> Option<(&String, &UserDocument)> {
        self.users
            .iter()
            .find(|(_, user)| user.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    pub name: String,
    pub email: String,
    pub device_id: String,
    pub password: PasswordDigest,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub created_at: DateTime<Utc>,
    /// Logins keyed by label.
    #[serde(default)]
    pub logins: BTreeMap<String, LoginDocument>,
}

impl CategoryDocument {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            logins: BTreeMap::new(),
        }
    }
}

impl Default for CategoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginDocument {
    pub username: String,
    pub secret: String,
    pub updated_at: DateTime<Utc>,
}
