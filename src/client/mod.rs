//! HTTP client for the query proxy.
//!
//! Mirrors what the dashboard pages do: POST SQL to `/api/query`, decode the
//! envelope, and treat `success:false` as an error carrying the proxy's
//! message. Report pages batch their queries through [`reports`].

pub mod reports;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::chart::ChartRow;
use crate::models::{ConnectionConfig, TestConnectionResponse};

/// Failures surfaced by the dashboard client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure: the proxy itself was unreachable or returned
    /// an undecodable body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with a failure envelope.
    #[error("query failed: {0}")]
    Api(String),
}

/// Wire shape of `/api/query` responses, both envelope variants. The 400
/// validation shape (`{error}`) also lands here with `success` defaulted off.
#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<ChartRow>,
    #[serde(default)]
    error: Option<String>,
}

pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    /// `base_url` is the proxy root, e.g. `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        DashboardClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Execute SQL through the proxy and return the flat result rows.
    pub async fn query(&self, sql: &str) -> Result<Vec<ChartRow>, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/query", self.base_url))
            .json(&json!({ "sql": sql }))
            .send()
            .await?;

        let envelope: QueryEnvelope = response.json().await?;
        if !envelope.success {
            return Err(ClientError::Api(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(envelope.data)
    }

    /// Whether the proxy itself is up, regardless of database state.
    pub async fn health(&self) -> bool {
        match self.http.get(format!("{}/health", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Ask the proxy to probe an ad-hoc connection descriptor.
    pub async fn test_connection(
        &self,
        descriptor: &ConnectionConfig,
    ) -> Result<TestConnectionResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/test-connection", self.base_url))
            .json(descriptor)
            .send()
            .await?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = DashboardClient::new("http://localhost:3001///");
        assert_eq!(client.base_url, "http://localhost:3001");
    }

    #[test]
    fn envelope_defaults_cover_the_validation_shape() {
        let envelope: QueryEnvelope =
            serde_json::from_str(r#"{"error": "SQL query is required"}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.error.as_deref(), Some("SQL query is required"));
    }

    #[test]
    fn envelope_decodes_success_rows() {
        let envelope: QueryEnvelope = serde_json::from_str(
            r#"{"success": true, "data": [{"n": 1}], "rowCount": 1, "executionTime": 3}"#,
        )
        .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.len(), 1);
    }
}
