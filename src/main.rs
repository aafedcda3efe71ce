//! Server entrypoint.
//!
//! Resolves configuration, builds the shared pool, and runs the HTTP server
//! until a termination signal arrives, at which point it stops accepting
//! requests and drains the pool.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use log::{error, info, warn};

use cropline::api;
use cropline::config::Settings;
use cropline::db::postgres;
use cropline::state::AppState;

#[actix_web::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.clone()),
    )
    .init();

    info!("cropline v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "database: {}:{}/{}",
        settings.database.host, settings.database.port, settings.database.database
    );

    // The pool is lazy; probe it once so reachability shows up in the logs,
    // but start serving either way. Per-request errors cover the rest.
    let pool = postgres::create_pool(&settings.database, &settings.pool)?;
    match sqlx::query_scalar::<_, String>("SELECT version()")
        .fetch_one(&pool)
        .await
    {
        Ok(version) => info!("connected to PostgreSQL: {}", version),
        Err(e) => warn!("database not reachable at startup: {}", e),
    }

    let state = web::Data::new(AppState::new(pool.clone(), settings.test_connect_timeout));
    state.set_config(settings.database.clone());

    let bind_addr = ("0.0.0.0", settings.port);
    info!("starting HTTP server on port {}", settings.port);

    let state_for_app = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .app_data(state_for_app.clone())
            .app_data(web::JsonConfig::default().error_handler(api::handlers::json_error_handler))
            .configure(api::configure)
    })
    .bind(bind_addr)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            if let Err(e) = result {
                error!("server task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down...");
            server_handle.stop(true).await;
            pool.close().await;
        }
    }

    info!("server shutdown complete");
    Ok(())
}
