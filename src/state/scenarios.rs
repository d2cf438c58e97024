//! Conversation scenarios implementation
//!
//! This module defines the conversation scenarios users can go through.
//! The only scenario today is the create-user form: username, password,
//! connection limit, expiration in days.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::utils::errors::{BotError, Result};
use crate::utils::validators::UserValidator;
use super::context::ConversationContext;

pub const CREATE_USER_SCENARIO: &str = "create_user";

/// Step identifiers of the create-user scenario
pub mod steps {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const CONNECTION_LIMIT: &str = "connection_limit";
    pub const EXPIRATION_DATE: &str = "expiration_date";
}

/// Represents a conversation scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Initial step when starting this scenario
    pub initial_step: String,
    /// All possible steps in this scenario
    pub steps: HashMap<String, ScenarioStep>,
    /// Maximum duration for this scenario (in seconds)
    pub max_duration: Option<u64>,
}

/// Represents a step within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Step identifier
    pub id: String,
    /// Translation key of the prompt shown when this step starts
    pub prompt_key: String,
    /// Translation key of the error shown when input is rejected
    pub error_key: String,
    /// Possible next steps from this step; empty for the last step
    pub next_steps: Vec<String>,
    /// Validation rules for user input
    pub validation: Option<StepValidation>,
}

/// Validation rules for a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidation {
    /// Input type expected
    pub input_type: InputType,
}

/// Types of input expected in a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    Username,
    Password,
    ConnectionLimit,
    ExpirationDays,
}

/// Scenario manager for handling all conversation scenarios
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    scenarios: HashMap<String, Scenario>,
    validator: UserValidator,
}

impl ScenarioManager {
    /// Create a new scenario manager with default scenarios
    pub fn new(validator: UserValidator, conversation_timeout_seconds: u64) -> Self {
        let mut manager = Self {
            scenarios: HashMap::new(),
            validator,
        };

        manager.register_scenario(create_user_scenario(conversation_timeout_seconds));
        manager
    }

    /// Register a new scenario
    pub fn register_scenario(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.id.clone(), scenario);
    }

    /// Get a scenario by ID
    pub fn get_scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// Start a scenario for a user
    pub fn start_scenario(&self, context: &mut ConversationContext, scenario_id: &str) -> Result<()> {
        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| BotError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        context.start_scenario(scenario_id, &scenario.initial_step)?;

        if let Some(max_duration) = scenario.max_duration {
            let expiry = chrono::Utc::now() + chrono::Duration::seconds(max_duration as i64);
            context.set_expiry(expiry);
        }

        Ok(())
    }

    /// Move to the next step in a scenario
    pub fn next_step(&self, context: &mut ConversationContext, next_step: &str) -> Result<()> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| BotError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: next_step.to_string(),
            })?;

        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| BotError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        let current_step_id = context.step.as_ref()
            .ok_or_else(|| BotError::InvalidStateTransition {
                from: "no_step".to_string(),
                to: next_step.to_string(),
            })?;

        let current_step = scenario.steps.get(current_step_id)
            .ok_or_else(|| BotError::InvalidInput(format!("Unknown step: {}", current_step_id)))?;

        if !current_step.next_steps.iter().any(|s| s == next_step) {
            return Err(BotError::InvalidStateTransition {
                from: current_step_id.clone(),
                to: next_step.to_string(),
            });
        }

        if !scenario.steps.contains_key(next_step) {
            return Err(BotError::InvalidInput(format!("Unknown step: {}", next_step)));
        }

        context.next_step(next_step)?;
        Ok(())
    }

    /// Validate user input for the current step
    pub fn validate_input(&self, context: &ConversationContext, input: &str) -> Result<()> {
        let step = self.get_current_step(context)?;

        if let Some(validation) = &step.validation {
            self.validate_input_against_rules(input, validation)?;
        }

        Ok(())
    }

    fn validate_input_against_rules(&self, input: &str, validation: &StepValidation) -> Result<()> {
        match validation.input_type {
            InputType::Username => self.validator.check_username(input)?,
            InputType::Password => self.validator.check_password(input)?,
            InputType::ConnectionLimit => {
                self.validator.check_connection_limit(input)?;
            }
            InputType::ExpirationDays => {
                self.validator.check_expiration_days(input)?;
            }
        }
        Ok(())
    }

    /// Get the current step information
    pub fn get_current_step(&self, context: &ConversationContext) -> Result<&ScenarioStep> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| BotError::InvalidInput("No active scenario".to_string()))?;

        let step_id = context.step.as_ref()
            .ok_or_else(|| BotError::InvalidInput("No active step".to_string()))?;

        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| BotError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        scenario.steps.get(step_id)
            .ok_or_else(|| BotError::InvalidInput(format!("Unknown step: {}", step_id)))
    }
}

fn step(id: &str, input_type: InputType, next: Option<&str>) -> ScenarioStep {
    ScenarioStep {
        id: id.to_string(),
        prompt_key: format!("create_user.prompt.{}", id),
        error_key: format!("create_user.invalid.{}", id),
        next_steps: next.map(|s| vec![s.to_string()]).unwrap_or_default(),
        validation: Some(StepValidation { input_type }),
    }
}

/// Create the user provisioning scenario
fn create_user_scenario(max_duration: u64) -> Scenario {
    let step_map = [
        step(steps::USERNAME, InputType::Username, Some(steps::PASSWORD)),
        step(steps::PASSWORD, InputType::Password, Some(steps::CONNECTION_LIMIT)),
        step(steps::CONNECTION_LIMIT, InputType::ConnectionLimit, Some(steps::EXPIRATION_DATE)),
        step(steps::EXPIRATION_DATE, InputType::ExpirationDays, None),
    ]
    .into_iter()
    .map(|s| (s.id.clone(), s))
    .collect();

    Scenario {
        id: CREATE_USER_SCENARIO.to_string(),
        name: "Create User".to_string(),
        initial_step: steps::USERNAME.to_string(),
        steps: step_map,
        max_duration: Some(max_duration),
    }
}
