//! In-memory implementations of the storage traits

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use ProvisionBot::database::{AccountStore, DealerStore, UserStore};
use ProvisionBot::models::{Account, Dealer, NewUser, ProvisionedUser, UpsertDealerRequest};
use ProvisionBot::{BotError, Result};

/// Users keyed by username
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, ProvisionedUser>>,
    /// When set, `create` fails with a database-style error
    pub fail_creates: AtomicBool,
}

impl MemoryUserStore {
    pub async fn count(&self) -> usize {
        self.users.lock().await.len()
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<ProvisionedUser> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(BotError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut users = self.users.lock().await;
        if users.contains_key(&user.username) {
            return Err(BotError::UsernameTaken { username: user.username });
        }

        let created = ProvisionedUser {
            id: users.len() as i64 + 1,
            username: user.username.clone(),
            password: user.password,
            connection_limit: user.connection_limit,
            expiration_date: user.expiration_date,
            created_at: Utc::now(),
        };
        users.insert(user.username, created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ProvisionedUser>> {
        Ok(self.users.lock().await.get(username).cloned())
    }
}

#[derive(Default)]
pub struct MemoryDealerStore {
    dealers: Mutex<HashMap<i64, Dealer>>,
}

impl MemoryDealerStore {
    pub async fn limit_of(&self, dealer_id: i64) -> Option<i32> {
        self.dealers
            .lock()
            .await
            .get(&dealer_id)
            .map(|d| d.account_creation_limit)
    }
}

#[async_trait]
impl DealerStore for MemoryDealerStore {
    async fn find(&self, dealer_id: i64) -> Result<Option<Dealer>> {
        Ok(self.dealers.lock().await.get(&dealer_id).cloned())
    }

    async fn upsert(&self, request: UpsertDealerRequest) -> Result<Dealer> {
        let now = Utc::now();
        let mut dealers = self.dealers.lock().await;
        let dealer = dealers
            .entry(request.id)
            .and_modify(|d| {
                d.account_creation_limit = request.account_creation_limit;
                d.updated_at = now;
            })
            .or_insert_with(|| Dealer {
                id: request.id,
                account_creation_limit: request.account_creation_limit,
                created_at: now,
                updated_at: now,
            });
        Ok(dealer.clone())
    }

    async fn try_consume_quota(&self, dealer_id: i64) -> Result<bool> {
        let mut dealers = self.dealers.lock().await;
        match dealers.get_mut(&dealer_id) {
            Some(dealer) if dealer.account_creation_limit > 0 => {
                dealer.account_creation_limit -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn refund_quota(&self, dealer_id: i64) -> Result<()> {
        if let Some(dealer) = self.dealers.lock().await.get_mut(&dealer_id) {
            dealer.account_creation_limit += 1;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    pub async fn all(&self) -> Vec<Account> {
        self.accounts.lock().await.clone()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, user_id: i64, dealer_id: i64) -> Result<Account> {
        let account = Account {
            id: user_id,
            dealer_id,
            created_at: Utc::now(),
        };
        self.accounts.lock().await.push(account.clone());
        Ok(account)
    }

    async fn count_for_dealer(&self, dealer_id: i64) -> Result<i64> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|a| a.dealer_id == dealer_id)
            .count() as i64)
    }
}
