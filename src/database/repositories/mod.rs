//! Database repositories module
//! 
//! This module contains all repository implementations for data access

pub mod user;
pub mod dealer;
pub mod account;

// Re-export repositories
pub use user::UserRepository;
pub use dealer::DealerRepository;
pub use account::AccountRepository;
