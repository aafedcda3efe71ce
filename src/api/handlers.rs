//! Request handlers for the query proxy.
//!
//! Every failure is recovered here and converted into a structured JSON
//! envelope; nothing propagates past the HTTP layer. Connectivity failures in
//! `/api/test-connection` are results (HTTP 200, `success:false`), database
//! failures in `/api/query` are HTTP 500 envelopes with the backend SQLSTATE.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info, warn};
use serde_json::json;

use crate::db::postgres::{self, sanitize_error};
use crate::error::ProxyError;
use crate::models::{ConnectionConfig, QueryErrorResponse, QueryRequest, QueryResponse, TestConnectionResponse};
use crate::state::AppState;

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// POST /api/test-connection
///
/// Validates the descriptor, then probes it with a short-lived pool that is
/// torn down on both paths. Probe failure is an answer, not a fault.
pub async fn test_connection(
    state: web::Data<AppState>,
    body: web::Json<ConnectionConfig>,
) -> HttpResponse {
    let descriptor = body.into_inner();

    if let Err(e) = descriptor.validate() {
        return HttpResponse::BadRequest().json(json!({ "error": e.message() }));
    }

    match postgres::test_connection(&descriptor, state.connect_timeout()).await {
        Ok(outcome) => {
            info!(
                "connection test ok: {}:{}/{} ({}ms)",
                descriptor.host, descriptor.port, descriptor.database, outcome.latency_ms
            );
            HttpResponse::Ok().json(TestConnectionResponse::ok(
                outcome.server_version,
                outcome.latency_ms,
            ))
        }
        Err(e) => {
            warn!(
                "connection test failed: {}:{}/{}: {}",
                descriptor.host,
                descriptor.port,
                descriptor.database,
                sanitize_error(&e.to_string())
            );
            HttpResponse::Ok().json(TestConnectionResponse::failed(sanitize_error(
                &e.to_string(),
            )))
        }
    }
}

/// POST /api/query
///
/// Rejects absent or blank SQL before touching the pool; otherwise forwards
/// the text with positional parameters and wraps the outcome.
pub async fn query(state: web::Data<AppState>, body: web::Json<QueryRequest>) -> HttpResponse {
    let request = body.into_inner();

    let sql = match request.sql.as_deref().map(str::trim) {
        Some(sql) if !sql.is_empty() => sql,
        _ => {
            return HttpResponse::BadRequest().json(json!({ "error": "SQL query is required" }));
        }
    };

    info!("executing query: {}", truncate_sql(sql));

    match postgres::execute_query(state.pool(), sql, &request.params).await {
        Ok(output) => {
            info!(
                "query ok: {} rows in {}ms",
                output.row_count, output.execution_time_ms
            );
            HttpResponse::Ok().json(QueryResponse::new(output.rows, output.execution_time_ms))
        }
        Err(e) => {
            let e = ProxyError::from(e);
            error!("query failed: {}", e.message());
            HttpResponse::InternalServerError()
                .json(QueryErrorResponse::new(e.message(), e.sqlstate()))
        }
    }
}

/// Convert body-deserialization faults into the same `{error}` shape as the
/// validation path instead of actix's plaintext default.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}

/// Queries are logged truncated; reporting view selects run long.
fn truncate_sql(sql: &str) -> String {
    const LIMIT: usize = 100;
    if sql.chars().count() <= LIMIT {
        sql.to_string()
    } else {
        let truncated: String = sql.chars().take(LIMIT).collect();
        format!("{}...", truncated)
    }
}
