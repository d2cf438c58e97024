//! User provisioning service implementation
//! 
//! Both the create-user conversation and the `/create_user` command end here:
//! validate, reserve dealer quota, create the user, record ownership.

use std::sync::Arc;
use tracing::{debug, error, warn};
use crate::database::traits::{AccountStore, DealerStore, UserStore};
use crate::models::user::{NewUser, ProvisionedUser};
use crate::utils::errors::{BotError, Result, ValidationError};
use crate::utils::helpers::expiration_from_days;
use crate::utils::logging::log_provisioning;
use crate::utils::validators::UserValidator;

/// Provisioning service for creating VPN users on behalf of admins and dealers
#[derive(Clone)]
pub struct ProvisioningService {
    users: Arc<dyn UserStore>,
    dealers: Arc<dyn DealerStore>,
    accounts: Arc<dyn AccountStore>,
    validator: UserValidator,
}

impl ProvisioningService {
    pub fn new(
        users: Arc<dyn UserStore>,
        dealers: Arc<dyn DealerStore>,
        accounts: Arc<dyn AccountStore>,
        validator: UserValidator,
    ) -> Self {
        Self {
            users,
            dealers,
            accounts,
            validator,
        }
    }

    pub fn validator(&self) -> &UserValidator {
        &self.validator
    }

    /// Assemble a `NewUser` expiring `days` days from now
    pub fn build_user(
        &self,
        username: &str,
        password: &str,
        connection_limit: i32,
        days: i64,
    ) -> std::result::Result<NewUser, ValidationError> {
        let expiration_date = expiration_from_days(days).ok_or_else(|| {
            ValidationError::Expiration(format!("{} days is out of range", days))
        })?;

        Ok(NewUser {
            username: username.to_string(),
            password: password.to_string(),
            connection_limit,
            expiration_date,
        })
    }

    /// Create a user for `actor_id`.
    ///
    /// When the actor is a dealer one unit of quota is reserved before the
    /// user is created and refunded if creation fails. Admins who are not
    /// dealers are not metered.
    pub async fn provision(&self, actor_id: i64, new_user: NewUser) -> Result<ProvisionedUser> {
        debug!(actor_id = actor_id, username = %new_user.username, "Provisioning user");

        if let Err(e) = self.validator.validate(&new_user) {
            log_provisioning(actor_id, &new_user.username, false, Some(&e.to_string()));
            return Err(e.into());
        }

        let reserved = self.reserve_quota(actor_id).await?;
        let username = new_user.username.clone();

        let user = match self.users.create(new_user).await {
            Ok(user) => user,
            Err(e) => {
                if reserved {
                    self.refund_quota(actor_id).await;
                }
                log_provisioning(actor_id, &username, false, Some(&e.to_string()));
                return Err(e);
            }
        };

        if reserved {
            if let Err(e) = self.accounts.create(user.id, actor_id).await {
                error!(
                    actor_id = actor_id,
                    user_id = user.id,
                    error = %e,
                    "Failed to record account ownership"
                );
            }
        }

        log_provisioning(actor_id, &user.username, true, None);
        Ok(user)
    }

    /// Returns true when a unit was reserved, false for non-dealers
    async fn reserve_quota(&self, actor_id: i64) -> Result<bool> {
        if self.dealers.find(actor_id).await?.is_none() {
            return Ok(false);
        }

        if self.dealers.try_consume_quota(actor_id).await? {
            Ok(true)
        } else {
            warn!(dealer_id = actor_id, "Dealer quota exhausted");
            Err(BotError::QuotaExhausted { dealer_id: actor_id })
        }
    }

    async fn refund_quota(&self, actor_id: i64) {
        if let Err(e) = self.dealers.refund_quota(actor_id).await {
            error!(dealer_id = actor_id, error = %e, "Failed to refund dealer quota");
        }
    }
}

impl std::fmt::Debug for ProvisioningService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningService")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
