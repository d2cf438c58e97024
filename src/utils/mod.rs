//! Utility modules
//! 
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, field validators and helper functions.

pub mod errors;
pub mod logging;
pub mod helpers;
pub mod validators;

pub use errors::{BotError, ValidationError, Result};
pub use validators::UserValidator;
