//! Dealer service implementation
//! 
//! Quota lookups for the menu and the pre-flight checks of both creation
//! paths, plus dealer management for admins.

use std::sync::Arc;
use tracing::{debug, info};
use crate::database::traits::{AccountStore, DealerStore};
use crate::models::dealer::{Dealer, UpsertDealerRequest};
use crate::utils::errors::{BotError, Result};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct DealerService {
    dealers: Arc<dyn DealerStore>,
    accounts: Arc<dyn AccountStore>,
}

impl DealerService {
    pub fn new(dealers: Arc<dyn DealerStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { dealers, accounts }
    }

    /// Remaining account-creation limit, `None` for non-dealers
    pub async fn remaining_quota(&self, user_id: i64) -> Result<Option<i32>> {
        Ok(self
            .dealers
            .find(user_id)
            .await?
            .map(|dealer| dealer.account_creation_limit))
    }

    /// True when the user is a dealer with no limit left.
    /// Non-dealers are never exhausted.
    pub async fn is_quota_exhausted(&self, user_id: i64) -> Result<bool> {
        let exhausted = matches!(self.dealers.find(user_id).await?, Some(dealer) if !dealer.has_quota());
        debug!(user_id = user_id, exhausted = exhausted, "Checked dealer quota");
        Ok(exhausted)
    }

    /// Number of accounts recorded for a dealer
    pub async fn accounts_created(&self, dealer_id: i64) -> Result<i64> {
        self.accounts.count_for_dealer(dealer_id).await
    }

    /// Create a dealer or reset an existing dealer's limit
    pub async fn set_dealer(&self, admin_id: i64, dealer_id: i64, limit: i32) -> Result<Dealer> {
        if limit < 0 {
            return Err(BotError::InvalidInput(format!(
                "Account creation limit must not be negative: {}",
                limit
            )));
        }

        let dealer = self
            .dealers
            .upsert(UpsertDealerRequest {
                id: dealer_id,
                account_creation_limit: limit,
            })
            .await?;

        log_admin_action(
            admin_id,
            "set_dealer",
            Some(&dealer_id.to_string()),
            Some(&format!("limit={}", limit)),
        );
        info!(dealer_id = dealer_id, limit = limit, "Dealer limit updated");

        Ok(dealer)
    }
}

impl std::fmt::Debug for DealerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealerService").finish_non_exhaustive()
    }
}
