//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod dealer;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthService, AuthContext, Permission};
pub use dealer::DealerService;
pub use user::ProvisioningService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::validators::UserValidator;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub dealer_service: DealerService,
    pub provisioning_service: ProvisioningService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, database: &DatabaseService) -> Self {
        let auth_service = AuthService::new(settings, database.dealers.clone());
        let dealer_service = DealerService::new(database.dealers.clone(), database.accounts.clone());
        let provisioning_service = ProvisioningService::new(
            database.users.clone(),
            database.dealers.clone(),
            database.accounts.clone(),
            UserValidator::from_config(&settings.provisioning),
        );

        Self {
            auth_service,
            dealer_service,
            provisioning_service,
        }
    }
}
