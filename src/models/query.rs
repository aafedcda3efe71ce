use serde::{Deserialize, Serialize};

/// Body of `POST /api/query`: opaque SQL text plus positional bind values.
///
/// The text is forwarded to the database as-is; only presence is checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
}

/// Success envelope for `/api/query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    /// Ordered result rows, each a flat column-name → scalar map.
    pub data: Vec<serde_json::Value>,
    pub row_count: usize,
    /// Wall-clock execution time in milliseconds.
    pub execution_time: u64,
}

impl QueryResponse {
    pub fn new(data: Vec<serde_json::Value>, execution_time: u64) -> Self {
        QueryResponse {
            success: true,
            row_count: data.len(),
            data,
            execution_time,
        }
    }
}

/// Failure envelope for `/api/query` (HTTP 500).
#[derive(Debug, Clone, Serialize)]
pub struct QueryErrorResponse {
    pub success: bool,
    pub error: String,
    /// Backend SQLSTATE, when the driver exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl QueryErrorResponse {
    pub fn new(error: String, code: Option<String>) -> Self {
        QueryErrorResponse {
            success: false,
            error,
            code,
        }
    }
}
