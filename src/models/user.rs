// src/models/user.rs
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Doctor,
    Staff,
}

/// Login identity. Doctors and medical-record authors point at one of these.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Nested account representation used inside other resources.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AccountSummary {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<UserAccount> for AccountSummary {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}
