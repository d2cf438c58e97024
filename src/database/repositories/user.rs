//! Provisioned user repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::database::traits::UserStore;
use crate::models::user::{NewUser, ProvisionedUser};
use crate::utils::errors::{BotError, Result};

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: NewUser) -> Result<ProvisionedUser> {
        let username = user.username.clone();
        let created = sqlx::query_as::<_, ProvisionedUser>(
            r#"
            INSERT INTO vpn_users (username, password, connection_limit, expiration_date, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password, connection_limit, expiration_date, created_at
            "#
        )
        .bind(user.username)
        .bind(user.password)
        .bind(user.connection_limit)
        .bind(user.expiration_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                BotError::UsernameTaken { username }
            }
            other => BotError::Database(other),
        })?;

        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ProvisionedUser>> {
        let user = sqlx::query_as::<_, ProvisionedUser>(
            "SELECT id, username, password, connection_limit, expiration_date, created_at FROM vpn_users WHERE username = $1"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
