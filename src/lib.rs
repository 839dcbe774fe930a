pub mod api;
pub mod app_env;
pub mod client;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;

#[cfg(test)]
mod integration_test;

use axum::extract::State;
use std::sync::Arc;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor giving route handlers access to [SharedData]
pub type AppState = State<Arc<SharedData>>;
