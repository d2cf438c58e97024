//! Conversation context management
//! 
//! This module handles user conversation context, tracking current scenarios,
//! steps, and associated data for each user's interaction with the bot.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

use crate::utils::errors::{BotError, Result};

/// User conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// User ID this context belongs to
    pub user_id: i64,
    /// Chat the conversation runs in
    pub chat_id: Option<i64>,
    /// Current scenario the user is in
    pub scenario: Option<String>,
    /// Current step within the scenario
    pub step: Option<String>,
    /// Scenario-specific data
    pub data: HashMap<String, serde_json::Value>,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new conversation context for a user
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            chat_id: None,
            scenario: None,
            step: None,
            data: HashMap::new(),
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_chat(mut self, chat_id: i64) -> Self {
        self.chat_id = Some(chat_id);
        self
    }

    /// Start a new scenario
    pub fn start_scenario(&mut self, scenario: &str, initial_step: &str) -> Result<()> {
        self.scenario = Some(scenario.to_string());
        self.step = Some(initial_step.to_string());
        self.data.clear();
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + Duration::hours(24));
        Ok(())
    }

    /// Move to the next step in the current scenario
    pub fn next_step(&mut self, step: &str) -> Result<()> {
        if self.scenario.is_none() {
            return Err(BotError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: step.to_string(),
            });
        }
        
        self.step = Some(step.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Set data for the current context
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get data from the current context
    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        if let Some(value) = self.data.get(key) {
            let result: T = serde_json::from_value(value.clone())?;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// Get string data (convenience method)
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key).unwrap_or(None)
    }

    /// Get integer data (convenience method)
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_data::<i64>(key).unwrap_or(None)
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Set custom expiry time
    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Check if user is in a specific scenario
    pub fn is_in_scenario(&self, scenario: &str) -> bool {
        self.scenario.as_ref().map_or(false, |s| s == scenario)
    }

    /// Check if user is at a specific step
    pub fn is_at_step(&self, step: &str) -> bool {
        self.step.as_ref().map_or(false, |s| s == step)
    }

    /// Check if user is in a specific scenario and step
    pub fn is_at(&self, scenario: &str, step: &str) -> bool {
        self.is_in_scenario(scenario) && self.is_at_step(step)
    }

    /// Validate context data against expected schema
    pub fn validate_data(&self, required_keys: &[&str]) -> Result<()> {
        for key in required_keys {
            if !self.data.contains_key(*key) {
                return Err(BotError::InvalidInput(
                    format!("Missing required context data: {}", key)
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context() {
        let context = ConversationContext::new(123).with_chat(-5);
        assert_eq!(context.user_id, 123);
        assert_eq!(context.chat_id, Some(-5));
        assert!(context.scenario.is_none());
        assert!(context.step.is_none());
        assert!(context.data.is_empty());
        assert!(context.expires_at.is_none());
    }

    #[test]
    fn test_start_scenario() {
        let mut context = ConversationContext::new(123);
        context.set_data("stale", "value").unwrap();
        context.start_scenario("create_user", "username").unwrap();
        
        assert_eq!(context.scenario, Some("create_user".to_string()));
        assert_eq!(context.step, Some("username".to_string()));
        assert!(context.expires_at.is_some());
        assert!(context.data.is_empty());
    }

    #[test]
    fn test_next_step_requires_scenario() {
        let mut context = ConversationContext::new(123);
        assert!(matches!(
            context.next_step("password"),
            Err(BotError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_data_operations() {
        let mut context = ConversationContext::new(123);
        
        context.set_data("username", "alice").unwrap();
        context.set_data("connection_limit", 2).unwrap();
        
        assert_eq!(context.get_string("username"), Some("alice".to_string()));
        assert_eq!(context.get_i64("connection_limit"), Some(2));
        assert_eq!(context.get_string("nonexistent"), None);
        
        assert!(context.validate_data(&["username", "connection_limit"]).is_ok());
        assert!(context.validate_data(&["password"]).is_err());
    }

    #[test]
    fn test_scenario_checks() {
        let mut context = ConversationContext::new(123);
        context.start_scenario("create_user", "username").unwrap();
        
        assert!(context.is_in_scenario("create_user"));
        assert!(context.is_at_step("username"));
        assert!(context.is_at("create_user", "username"));
        assert!(!context.is_at("create_user", "password"));
        assert!(!context.is_in_scenario("onboarding"));
    }

    #[test]
    fn test_expiry() {
        let mut context = ConversationContext::new(123);
        assert!(!context.is_expired());

        context.set_expiry(Utc::now() - Duration::hours(1));
        assert!(context.is_expired());
        
        context.set_expiry(Utc::now() + Duration::hours(1));
        assert!(!context.is_expired());
    }
}
