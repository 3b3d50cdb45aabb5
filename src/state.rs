use std::sync::Arc;

use crate::auth::identity::{IdentityProvider, JwtIdentityProvider};
use crate::backend::postgres::{self, PgDealsStore};
use crate::backend::{DealsStore, StoreError};
use crate::config;

/// Shared application state, constructed once at startup and cloned into
/// every handler. Both collaborators are trait objects so tests can swap in
/// stubs instead of a live backend.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DealsStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn DealsStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Production wiring: one Postgres pool shared by the deals store and
    /// the identity resolver.
    pub async fn from_env() -> Result<Self, StoreError> {
        let cfg = config::config();
        let pool = postgres::connect_pool(&cfg.database).await?;

        let store = Arc::new(PgDealsStore::new(pool.clone()));
        let identity = Arc::new(JwtIdentityProvider::new(
            cfg.security.jwt_secret.clone(),
            pool,
        ));

        Ok(Self::new(store, identity))
    }
}
