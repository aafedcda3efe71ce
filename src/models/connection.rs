use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

/// Parameters identifying a target PostgreSQL database.
///
/// The server's own descriptor is read from the environment at startup;
/// ad-hoc descriptors arrive in `/api/test-connection` request bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    /// Only used in transit; never echoed back in responses.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Require TLS for the connection.
    #[serde(default)]
    pub ssl: bool,
}

impl ConnectionConfig {
    /// Check the descriptor invariants before any network activity.
    ///
    /// `port` is a `u16`, so the upper bound holds by construction; serde
    /// rejects out-of-range values at deserialization time.
    pub fn validate(&self) -> Result<(), ProxyError> {
        if self.host.trim().is_empty() {
            return Err(ProxyError::Validation("host is required".into()));
        }
        if self.database.trim().is_empty() {
            return Err(ProxyError::Validation("database is required".into()));
        }
        if self.user.trim().is_empty() {
            return Err(ProxyError::Validation("user is required".into()));
        }
        if self.port == 0 {
            return Err(ProxyError::Validation("port must be in 1..=65535".into()));
        }
        Ok(())
    }

    /// Registry key for this descriptor: the logical id, falling back to the
    /// display name.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.name.as_deref())
    }
}

/// Envelope returned by `/api/test-connection`. Connectivity failure is a
/// result, not a fault, so both variants ship with HTTP 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConnectionResponse {
    pub success: bool,
    pub message: String,
    pub details: TestConnectionDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    /// Connect-and-probe round trip in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestConnectionResponse {
    pub fn ok(server_version: String, latency: u64) -> Self {
        TestConnectionResponse {
            success: true,
            message: "Connection successful".to_string(),
            details: TestConnectionDetails {
                server_version: Some(server_version),
                latency: Some(latency),
                error: None,
            },
        }
    }

    pub fn failed(error: String) -> Self {
        TestConnectionResponse {
            success: false,
            message: "Connection failed".to_string(),
            details: TestConnectionDetails {
                error: Some(error),
                ..TestConnectionDetails::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ConnectionConfig {
        ConnectionConfig {
            id: Some("primary".into()),
            name: None,
            host: "localhost".into(),
            port: 5432,
            database: "postgres".into(),
            user: "postgres".into(),
            password: String::new(),
            ssl: false,
        }
    }

    #[test]
    fn valid_descriptor_passes() {
        assert!(descriptor().validate().is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = descriptor();
        config.host = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = descriptor();
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn key_prefers_id_over_name() {
        let mut config = descriptor();
        config.name = Some("Reporting Views".into());
        assert_eq!(config.key(), Some("primary"));
        config.id = None;
        assert_eq!(config.key(), Some("Reporting Views"));
    }

    #[test]
    fn failure_envelope_carries_error_detail() {
        let response = TestConnectionResponse::failed("connection refused".into());
        assert!(!response.success);
        assert_eq!(response.details.error.as_deref(), Some("connection refused"));
        assert!(response.details.server_version.is_none());
    }
}
