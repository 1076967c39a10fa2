//! HTTP API
//!
//! One GET endpoint per metrics category, each returning a JSON snapshot
//! taken at request time.

mod handlers;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::core::config::LogRegistry;
use crate::core::host_metrics::{CpuSampler, PingProbe};
use crate::error::HostMetricsError;

pub use handlers::{parse_length, DEFAULT_LENGTH};

/// State shared by all handlers. Nothing in here is mutated by a request
/// except the CPU sampler's baseline, which guards itself.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LogRegistry>,
    pub sampler: Arc<CpuSampler>,
    pub probe: Arc<PingProbe>,
}

impl AppState {
    pub fn new(registry: LogRegistry, sampler: CpuSampler, probe: PingProbe) -> Self {
        Self {
            registry: Arc::new(registry),
            sampler: Arc::new(sampler),
            probe: Arc::new(probe),
        }
    }
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/cpu_info", get(handlers::cpu_info))
        .route("/mem_info", get(handlers::mem_info))
        .route("/disk_info", get(handlers::disk_info))
        .route("/network_info", get(handlers::network_info))
        .route("/process_info", get(handlers::process_info))
        .route("/logs_info", get(handlers::logs_info))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl IntoResponse for HostMetricsError {
    fn into_response(self) -> Response {
        log::error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
