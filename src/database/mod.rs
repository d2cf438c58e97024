//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod service;
pub mod traits;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use repositories::{UserRepository, DealerRepository, AccountRepository};
pub use service::DatabaseService;
pub use traits::{UserStore, DealerStore, AccountStore};
