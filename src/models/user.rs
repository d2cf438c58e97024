//! Provisioned user model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A user account created on the VPN service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProvisionedUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub connection_limit: i32,
    pub expiration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields collected from the operator before the user exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub connection_limit: i32,
    pub expiration_date: DateTime<Utc>,
}
