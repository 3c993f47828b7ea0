use std::sync::Arc;

use explorers_core::error::CoreError;

use crate::auth::jwt::TokenService;
use crate::config::ServerConfig;
use crate::services::auth::AuthManager;
use crate::services::pg::PgStore;
use crate::services::progress::ProgressManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: explorers_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session token issuance and validation.
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthManager<PgStore>>,
    pub progress: Arc<ProgressManager<PgStore>>,
}

impl AppState {
    /// Wire the managers to a PostgreSQL store over `pool`.
    pub fn new(pool: explorers_db::DbPool, config: ServerConfig) -> Result<Self, CoreError> {
        let tokens = Arc::new(TokenService::new(config.jwt.clone()));
        let store = PgStore::new(pool.clone());
        let auth = AuthManager::new(store.clone(), Arc::clone(&tokens))?;
        let progress = ProgressManager::new(store);

        Ok(Self {
            pool,
            config: Arc::new(config),
            tokens,
            auth: Arc::new(auth),
            progress: Arc::new(progress),
        })
    }
}
