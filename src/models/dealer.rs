//! Dealer model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A reseller allowed to create a finite number of accounts.
/// `id` is the dealer's Telegram user id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dealer {
    pub id: i64,
    pub account_creation_limit: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dealer {
    pub fn has_quota(&self) -> bool {
        self.account_creation_limit > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertDealerRequest {
    pub id: i64,
    pub account_creation_limit: i32,
}
