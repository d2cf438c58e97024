//! Account repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::database::traits::AccountStore;
use crate::models::account::Account;
use crate::utils::errors::Result;

#[derive(Clone)]
#[derive(Debug)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create(&self, user_id: i64, dealer_id: i64) -> Result<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, dealer_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, dealer_id, created_at
            "#
        )
        .bind(user_id)
        .bind(dealer_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    async fn count_for_dealer(&self, dealer_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE dealer_id = $1")
            .bind(dealer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
