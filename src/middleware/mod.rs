//! Middleware module
//! 
//! This module contains middleware for request processing

pub mod auth;
pub mod logging;

// Re-export commonly used middleware
pub use auth::{PermissionGuard, CREATE_USER_PERMISSIONS, ADMIN_PERMISSIONS};
pub use logging::LoggingMiddleware;
