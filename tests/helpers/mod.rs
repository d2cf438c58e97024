//! Test helpers module
//!
//! Utilities shared by the integration tests: a mock Telegram API server,
//! in-memory stores, update builders and a unified test context.

#![allow(dead_code)]

pub mod telegram_mock;
pub mod memory_stores;
pub mod test_data;
pub mod test_context;

pub use telegram_mock::*;
pub use memory_stores::*;
pub use test_data::*;
pub use test_context::*;
