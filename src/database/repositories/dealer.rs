//! Dealer repository implementation

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::database::traits::DealerStore;
use crate::models::dealer::{Dealer, UpsertDealerRequest};
use crate::utils::errors::Result;
use crate::utils::logging::log_database_operation;

#[derive(Clone)]
#[derive(Debug)]
pub struct DealerRepository {
    pool: PgPool,
}

impl DealerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealerStore for DealerRepository {
    async fn find(&self, dealer_id: i64) -> Result<Option<Dealer>> {
        let dealer = sqlx::query_as::<_, Dealer>(
            "SELECT id, account_creation_limit, created_at, updated_at FROM dealers WHERE id = $1"
        )
        .bind(dealer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dealer)
    }

    async fn upsert(&self, request: UpsertDealerRequest) -> Result<Dealer> {
        let now = Utc::now();
        let dealer = sqlx::query_as::<_, Dealer>(
            r#"
            INSERT INTO dealers (id, account_creation_limit, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (id) DO UPDATE
            SET account_creation_limit = EXCLUDED.account_creation_limit,
                updated_at = EXCLUDED.updated_at
            RETURNING id, account_creation_limit, created_at, updated_at
            "#
        )
        .bind(request.id)
        .bind(request.account_creation_limit)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(dealer)
    }

    async fn try_consume_quota(&self, dealer_id: i64) -> Result<bool> {
        let started = Instant::now();
        let result = sqlx::query(
            r#"
            UPDATE dealers
            SET account_creation_limit = account_creation_limit - 1, updated_at = $2
            WHERE id = $1 AND account_creation_limit > 0
            "#
        )
        .bind(dealer_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        log_database_operation(
            "consume_quota",
            "dealers",
            started.elapsed().as_millis() as u64,
            result.is_ok(),
        );

        Ok(result?.rows_affected() == 1)
    }

    async fn refund_quota(&self, dealer_id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE dealers SET account_creation_limit = account_creation_limit + 1, updated_at = $2 WHERE id = $1"
        )
        .bind(dealer_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
