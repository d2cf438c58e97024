//! Account model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Links a provisioned user to the dealer that created it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Id of the provisioned user
    pub id: i64,
    pub dealer_id: i64,
    pub created_at: DateTime<Utc>,
}
