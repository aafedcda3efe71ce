use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use sqlx::PgPool;

use crate::models::ConnectionConfig;

/// Shared application state handed to every request handler.
///
/// The pool is constructed once at startup and passed in explicitly, so the
/// proxy service can be exercised in isolation with a test pool.
pub struct AppState {
    /// Shared connection pool for `/api/query`.
    pool: PgPool,
    /// Acquire timeout for ephemeral test-connection pools.
    connect_timeout: Duration,
    /// Known connection descriptors, keyed by logical id.
    configs: Mutex<HashMap<String, ConnectionConfig>>,
}

impl AppState {
    pub fn new(pool: PgPool, connect_timeout: Duration) -> Self {
        AppState {
            pool,
            connect_timeout,
            configs: Mutex::new(HashMap::new()),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Add or replace a descriptor. Descriptors without an id or name are
    /// not addressable and are ignored.
    pub fn set_config(&self, config: ConnectionConfig) {
        if let Some(key) = config.key().map(str::to_string) {
            let mut configs = self.configs.lock().unwrap();
            configs.insert(key, config);
        }
    }

    pub fn get_config(&self, key: &str) -> Option<ConnectionConfig> {
        let configs = self.configs.lock().unwrap();
        configs.get(key).cloned()
    }

    pub fn remove_config(&self, key: &str) -> Option<ConnectionConfig> {
        let mut configs = self.configs.lock().unwrap();
        configs.remove(key)
    }

    pub fn list_configs(&self) -> Vec<ConnectionConfig> {
        let configs = self.configs.lock().unwrap();
        configs.values().cloned().collect()
    }
}
