use axum::http::HeaderValue;
use axum::http::header::InvalidHeaderValue;
use std::env;

/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Maximum number of pooled database connections. Defaults to [DEFAULT_DB_MAX_CONNECTIONS]
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// Address the HTTP server binds to, i.e. "0.0.0.0:8080"
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
/// Comma-separated list of browser origins allowed to call the API
pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
/// Log level configuration for the application. For formatting info, see
/// [EnvFilter's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
/// The dev servers a frontend usually runs on
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Reads [SERVER_ADDRESS], falling back to [DEFAULT_SERVER_ADDRESS]
pub fn server_address() -> String {
    env::var(SERVER_ADDRESS).unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_owned())
}

/// Reads [DB_MAX_CONNECTIONS]. Unset or unparseable values fall back to [DEFAULT_DB_MAX_CONNECTIONS]
pub fn db_max_connections() -> u32 {
    env::var(DB_MAX_CONNECTIONS)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

/// Reads [CORS_ALLOWED_ORIGINS] and converts each origin into a header value
pub fn cors_allowed_origins() -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let raw_origins =
        env::var(CORS_ALLOWED_ORIGINS).unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGINS.to_owned());

    parse_origins(&raw_origins)
}

fn parse_origins(raw_origins: &str) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    raw_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(HeaderValue::from_str)
        .collect()
}
