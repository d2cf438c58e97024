//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod dealer;
pub mod account;

// Re-export commonly used models
pub use user::{ProvisionedUser, NewUser};
pub use dealer::{Dealer, UpsertDealerRequest};
pub use account::Account;
