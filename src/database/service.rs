//! Database service layer
//! 
//! Bundles the stores behind their traits so services can share one handle.

use std::sync::Arc;

use crate::database::{DatabasePool, UserRepository, DealerRepository, AccountRepository};
use crate::database::traits::{UserStore, DealerStore, AccountStore};

#[derive(Clone)]
pub struct DatabaseService {
    pub users: Arc<dyn UserStore>,
    pub dealers: Arc<dyn DealerStore>,
    pub accounts: Arc<dyn AccountStore>,
}

impl DatabaseService {
    /// Postgres-backed stores sharing one pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            dealers: Arc::new(DealerRepository::new(pool.clone())),
            accounts: Arc::new(AccountRepository::new(pool)),
        }
    }

    pub fn from_stores(
        users: Arc<dyn UserStore>,
        dealers: Arc<dyn DealerStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self { users, dealers, accounts }
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService").finish_non_exhaustive()
    }
}
