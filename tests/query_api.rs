//! HTTP surface tests for the query proxy.
//!
//! Validation paths run against a lazily-connected pool, so no database is
//! required: the handler must reject bad requests before any pool contact.
//! The end-to-end case needs a reachable PostgreSQL and is ignored by
//! default.

use std::time::Duration;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;

use cropline::api;
use cropline::config::Settings;
use cropline::db::postgres;
use cropline::state::AppState;

/// `connect_lazy` never opens a socket until a query runs, which keeps the
/// validation-path tests database-free.
fn lazy_state() -> web::Data<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://postgres@localhost:5432/postgres")
        .expect("connection string parses");
    web::Data::new(AppState::new(pool, Duration::from_secs(2)))
}

/// The initialized service type is unnameable, so app construction lives in
/// a macro instead of a helper fn.
macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .app_data(
                    web::JsonConfig::default().error_handler(api::handlers::json_error_handler),
                )
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn health_reports_ok_with_timestamp() {
    let app = init_app!(lazy_state());

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn query_without_sql_is_rejected_before_pool_contact() {
    let app = init_app!(lazy_state());

    let req = test::TestRequest::post()
        .uri("/api/query")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SQL query is required");
}

#[actix_web::test]
async fn blank_sql_counts_as_missing() {
    let app = init_app!(lazy_state());

    let req = test::TestRequest::post()
        .uri("/api/query")
        .set_json(json!({ "sql": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn malformed_body_yields_the_json_error_shape() {
    let app = init_app!(lazy_state());

    let req = test::TestRequest::post()
        .uri("/api/query")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn invalid_descriptor_is_rejected() {
    let app = init_app!(lazy_state());

    let req = test::TestRequest::post()
        .uri("/api/test-connection")
        .set_json(json!({
            "host": "",
            "port": 5432,
            "database": "postgres",
            "user": "postgres",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "host is required");
}

#[actix_web::test]
async fn unreachable_target_reports_a_failure_envelope() {
    let app = init_app!(lazy_state());

    // Nothing listens on port 1; the probe must come back as a result, not
    // an HTTP error.
    let req = test::TestRequest::post()
        .uri("/api/test-connection")
        .set_json(json!({
            "host": "127.0.0.1",
            "port": 1,
            "database": "postgres",
            "user": "postgres",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Connection failed");
    assert!(body["details"]["error"].is_string());
}

/// Requires a reachable PostgreSQL configured through the usual `CROPLINE_*`
/// variables: `cargo test -- --ignored`.
#[actix_web::test]
#[ignore]
async fn select_one_roundtrip() {
    let settings = Settings::from_env().expect("settings resolve");
    let pool = postgres::create_pool(&settings.database, &settings.pool).expect("pool builds");
    let state = web::Data::new(AppState::new(pool, settings.test_connect_timeout));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/query")
        .set_json(json!({ "sql": "SELECT 1 as n" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([{ "n": 1 }]));
    assert_eq!(body["rowCount"], 1);
    assert!(body["executionTime"].as_u64().is_some());
}

/// Zero-row results are still a success envelope.
#[actix_web::test]
#[ignore]
async fn empty_result_set_is_success_with_zero_rows() {
    let settings = Settings::from_env().expect("settings resolve");
    let pool = postgres::create_pool(&settings.database, &settings.pool).expect("pool builds");
    let state = web::Data::new(AppState::new(pool, settings.test_connect_timeout));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/query")
        .set_json(json!({ "sql": "SELECT 1 as n WHERE false" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["rowCount"], 0);
}

/// Execution faults carry the backend message and SQLSTATE.
#[actix_web::test]
#[ignore]
async fn execution_error_is_a_500_envelope_with_code() {
    let settings = Settings::from_env().expect("settings resolve");
    let pool = postgres::create_pool(&settings.database, &settings.pool).expect("pool builds");
    let state = web::Data::new(AppState::new(pool, settings.test_connect_timeout));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/query")
        .set_json(json!({ "sql": "SELECT * FROM no_such_relation_anywhere" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    // undefined_table
    assert_eq!(body["code"], "42P01");
}
