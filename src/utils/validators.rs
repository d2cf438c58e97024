//! Field validators for provisioned users
//!
//! Every field collected by the create-user conversation and the
//! `/create_user` command goes through [`UserValidator`]. The `validate_*`
//! methods answer yes/no for the chat flow; the `check_*` twins describe the
//! failure for logs and error values.

use chrono::Utc;

use crate::config::ProvisioningConfig;
use crate::models::user::NewUser;
use crate::utils::errors::ValidationError;
use crate::utils::helpers::{is_ascii_number, is_printable_ascii};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 4;
pub const PASSWORD_MAX_LEN: usize = 32;

/// Validates user fields against the configured provisioning limits
#[derive(Debug, Clone)]
pub struct UserValidator {
    max_connection_limit: i32,
    max_expiration_days: i64,
}

impl UserValidator {
    pub fn new(max_connection_limit: i32, max_expiration_days: i64) -> Self {
        Self {
            max_connection_limit,
            max_expiration_days,
        }
    }

    pub fn from_config(config: &ProvisioningConfig) -> Self {
        Self::new(config.max_connection_limit, config.max_expiration_days)
    }

    pub fn max_connection_limit(&self) -> i32 {
        self.max_connection_limit
    }

    pub fn max_expiration_days(&self) -> i64 {
        self.max_expiration_days
    }

    pub fn validate_username(&self, username: &str) -> bool {
        self.check_username(username).is_ok()
    }

    pub fn validate_password(&self, password: &str) -> bool {
        self.check_password(password).is_ok()
    }

    pub fn validate_connection_limit(&self, limit: &str) -> bool {
        self.check_connection_limit(limit).is_ok()
    }

    pub fn validate_expiration_date(&self, days: &str) -> bool {
        self.check_expiration_days(days).is_ok()
    }

    /// Usernames start with a letter and contain only `[A-Za-z0-9_]`
    pub fn check_username(&self, username: &str) -> Result<(), ValidationError> {
        let len = username.chars().count();
        if len < USERNAME_MIN_LEN || len > USERNAME_MAX_LEN {
            return Err(ValidationError::Username(format!(
                "length must be between {} and {} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            )));
        }

        if !username.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ValidationError::Username("must start with a letter".to_string()));
        }

        if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::Username(
                "only letters, digits and underscores are allowed".to_string(),
            ));
        }

        Ok(())
    }

    pub fn check_password(&self, password: &str) -> Result<(), ValidationError> {
        let len = password.chars().count();
        if len < PASSWORD_MIN_LEN || len > PASSWORD_MAX_LEN {
            return Err(ValidationError::Password(format!(
                "length must be between {} and {} characters",
                PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
            )));
        }

        if password.chars().any(char::is_whitespace) {
            return Err(ValidationError::Password("must not contain whitespace".to_string()));
        }

        if !is_printable_ascii(password) {
            return Err(ValidationError::Password(
                "only printable ASCII characters are allowed".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and bound-check a connection limit typed by the operator
    pub fn check_connection_limit(&self, limit: &str) -> Result<i32, ValidationError> {
        if !is_ascii_number(limit) {
            return Err(ValidationError::ConnectionLimit(format!("'{}' is not a number", limit)));
        }

        let value = limit
            .parse::<i32>()
            .map_err(|_| ValidationError::ConnectionLimit(format!("'{}' is out of range", limit)))?;

        self.check_connection_limit_value(value)?;
        Ok(value)
    }

    pub fn check_connection_limit_value(&self, value: i32) -> Result<(), ValidationError> {
        if value < 1 || value > self.max_connection_limit {
            return Err(ValidationError::ConnectionLimit(format!(
                "must be between 1 and {}",
                self.max_connection_limit
            )));
        }
        Ok(())
    }

    /// Parse and bound-check an expiration given in days
    pub fn check_expiration_days(&self, days: &str) -> Result<i64, ValidationError> {
        if !is_ascii_number(days) {
            return Err(ValidationError::Expiration(format!("'{}' is not a number", days)));
        }

        let value = days
            .parse::<i64>()
            .map_err(|_| ValidationError::Expiration(format!("'{}' is out of range", days)))?;

        self.check_expiration_days_value(value)?;
        Ok(value)
    }

    pub fn check_expiration_days_value(&self, value: i64) -> Result<(), ValidationError> {
        if value < 1 || value > self.max_expiration_days {
            return Err(ValidationError::Expiration(format!(
                "must be between 1 and {} days",
                self.max_expiration_days
            )));
        }
        Ok(())
    }

    /// Validate an assembled user before it is handed to the store
    pub fn validate(&self, user: &NewUser) -> Result<(), ValidationError> {
        self.check_username(&user.username)?;
        self.check_password(&user.password)?;
        self.check_connection_limit_value(user.connection_limit)?;

        if user.expiration_date <= Utc::now() {
            return Err(ValidationError::Expiration("must be in the future".to_string()));
        }

        Ok(())
    }
}

impl Default for UserValidator {
    fn default() -> Self {
        Self::from_config(&ProvisioningConfig::default())
    }
}
