use anyhow::Context;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use task_board::{SharedData, api, app_env, db, logging, persistence};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv().is_ok();

    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)?),
        _ => None,
    };
    let tracing_enabled = otel_exporters.is_some();
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);

    if !dotenv_loaded {
        warn!("No .env file found, reading configuration from the environment only");
    }
    if !tracing_enabled {
        info!("OpenTelemetry export URLs not set, spans and metrics stay local");
    }

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("the {} environment variable must be set", app_env::DB_URL))?;
    let sqlx_db_connection = db::connect_sqlx(&db_url, app_env::db_max_connections())
        .await
        .context("connecting to the task database")?;
    db::run_migrations(&sqlx_db_connection)
        .await
        .context("migrating the task database")?;
    info!("Database migrations applied");

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(sqlx_db_connection),
    });
    let allowed_origins = app_env::cors_allowed_origins()
        .with_context(|| format!("{} contains an invalid origin", app_env::CORS_ALLOWED_ORIGINS))?;
    let router = api::app_router(allowed_origins).with_state(shared_data);

    let server_address = app_env::server_address();
    let network_listener = TcpListener::bind(&server_address)
        .await
        .with_context(|| format!("binding to {server_address}"))?;
    info!("Starting server on {server_address}");

    axum::serve(network_listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP requests")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(signal_err) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for the shutdown signal: {signal_err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
