//! Authentication service implementation
//! 
//! Resolves which permissions a Telegram user holds: admins come from the
//! configuration, dealers from the dealer store.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use crate::config::settings::Settings;
use crate::database::traits::DealerStore;
use crate::utils::errors::{BotError, Result};

/// Permission levels for bot operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Listed in `bot.admin_ids`
    Admin,
    /// Present in the dealers table
    Dealer,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Admin => write!(f, "admin"),
            Permission::Dealer => write!(f, "dealer"),
        }
    }
}

/// Authentication context for a user
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub permissions: HashSet<Permission>,
}

impl AuthContext {
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// True when at least one of `required` is held
    pub fn has_any(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.has(*p))
    }

    pub fn is_admin(&self) -> bool {
        self.has(Permission::Admin)
    }

    pub fn is_dealer(&self) -> bool {
        self.has(Permission::Dealer)
    }
}

/// Authentication service for managing permissions and access control
#[derive(Clone)]
pub struct AuthService {
    admin_ids: HashSet<i64>,
    dealers: Arc<dyn DealerStore>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(settings: &Settings, dealers: Arc<dyn DealerStore>) -> Self {
        Self {
            admin_ids: settings.bot.admin_ids.iter().copied().collect(),
            dealers,
        }
    }

    /// Check if user is a bot admin
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Check if user is registered as a dealer
    pub async fn is_dealer(&self, user_id: i64) -> Result<bool> {
        Ok(self.dealers.find(user_id).await?.is_some())
    }

    /// Get authentication context for a user
    pub async fn get_auth_context(&self, user_id: i64) -> Result<AuthContext> {
        let mut permissions = HashSet::new();

        if self.is_admin(user_id) {
            permissions.insert(Permission::Admin);
        }

        if self.is_dealer(user_id).await? {
            permissions.insert(Permission::Dealer);
        }

        debug!(user_id = user_id, permissions = ?permissions, "Authentication context created");
        Ok(AuthContext { user_id, permissions })
    }

    /// Require any of the given permissions or return an error
    pub async fn require_any(&self, user_id: i64, required: &[Permission]) -> Result<AuthContext> {
        let context = self.get_auth_context(user_id).await?;

        if !context.has_any(required) {
            return Err(BotError::PermissionDenied(format!(
                "User {} lacks any of the required permissions: {:?}",
                user_id, required
            )));
        }

        Ok(context)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("admin_ids", &self.admin_ids)
            .finish_non_exhaustive()
    }
}
