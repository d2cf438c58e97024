//! Storage seams
//!
//! Services talk to storage through these traits so the Postgres
//! repositories can be swapped for in-memory stores in tests.

use async_trait::async_trait;

use crate::models::{Account, Dealer, NewUser, ProvisionedUser, UpsertDealerRequest};
use crate::utils::errors::Result;

/// Persistence of provisioned users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. A duplicate username yields `BotError::UsernameTaken`.
    async fn create(&self, user: NewUser) -> Result<ProvisionedUser>;

    async fn find_by_username(&self, username: &str) -> Result<Option<ProvisionedUser>>;
}

/// Dealers and their account-creation quota
#[async_trait]
pub trait DealerStore: Send + Sync {
    async fn find(&self, dealer_id: i64) -> Result<Option<Dealer>>;

    async fn upsert(&self, request: UpsertDealerRequest) -> Result<Dealer>;

    /// Take one unit of quota if any is left. Returns `false` when the dealer
    /// is unknown or exhausted. Must be atomic with respect to concurrent calls.
    async fn try_consume_quota(&self, dealer_id: i64) -> Result<bool>;

    /// Give back a unit taken by `try_consume_quota`
    async fn refund_quota(&self, dealer_id: i64) -> Result<()>;
}

/// Dealer-to-user ownership records
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, user_id: i64, dealer_id: i64) -> Result<Account>;

    async fn count_for_dealer(&self, dealer_id: i64) -> Result<i64>;
}
