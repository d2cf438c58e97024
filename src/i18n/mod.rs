//! Internationalization module
//!
//! This module handles multi-language support for the bot. Portuguese is
//! the default; translations live in `translations/<lang>.json`.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{I18n, TranslationParams, params};
