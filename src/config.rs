//! Runtime configuration, read from the environment at startup.
//!
//! Every variable has a hardcoded fallback so a bare `cropline` invocation
//! comes up against a local database.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::models::ConnectionConfig;

/// Shared pool limits. Exhaustion surfaces to callers as an acquire timeout.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_size: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            max_size: 10,
            idle_timeout: Duration::from_millis(30_000),
            connect_timeout: Duration::from_millis(2_000),
        }
    }
}

/// Everything the server needs, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port.
    pub port: u16,
    /// Descriptor for the shared pool's target database.
    pub database: ConnectionConfig,
    pub pool: PoolSettings,
    /// Acquire timeout for the ephemeral test-connection pools; looser than
    /// the shared pool's so slow-but-alive targets still report a latency.
    pub test_connect_timeout: Duration,
    pub log_level: String,
}

impl Settings {
    /// Read settings from `CROPLINE_*` environment variables, falling back to
    /// defaults, then validate.
    pub fn from_env() -> Result<Self> {
        let settings = Settings {
            port: env_parse("CROPLINE_PORT", 3001)?,
            database: ConnectionConfig {
                id: Some("primary".to_string()),
                name: None,
                host: env_string("CROPLINE_DB_HOST", "localhost"),
                port: env_parse("CROPLINE_DB_PORT", 5432)?,
                database: env_string("CROPLINE_DB_NAME", "postgres"),
                user: env_string("CROPLINE_DB_USER", "postgres"),
                password: env_string("CROPLINE_DB_PASSWORD", ""),
                ssl: env_bool("CROPLINE_DB_SSL"),
            },
            pool: PoolSettings {
                max_size: env_parse("CROPLINE_POOL_MAX", 10)?,
                idle_timeout: Duration::from_millis(env_parse(
                    "CROPLINE_IDLE_TIMEOUT_MS",
                    30_000,
                )?),
                connect_timeout: Duration::from_millis(env_parse(
                    "CROPLINE_CONNECT_TIMEOUT_MS",
                    2_000,
                )?),
            },
            test_connect_timeout: Duration::from_millis(env_parse(
                "CROPLINE_TEST_TIMEOUT_MS",
                5_000,
            )?),
            log_level: env_string("CROPLINE_LOG", "info"),
        };

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("listen port cannot be 0"));
        }
        if self.pool.max_size == 0 {
            return Err(anyhow!("pool size cannot be 0"));
        }
        self.database
            .validate()
            .map_err(|e| anyhow!("database settings: {}", e))?;
        Ok(())
    }
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow!("invalid {} value '{}': {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn env_bool(name: &str) -> bool {
    match env::var(name) {
        Ok(raw) => {
            let raw = raw.to_lowercase();
            raw == "true" || raw == "1" || raw == "yes"
        }
        Err(_) => false,
    }
}
