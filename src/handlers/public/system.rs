use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub url: String,
    pub message: String,
}

/// GET / - where the service can be reached on the local network
pub async fn root(State(state): State<AppState>) -> ApiResult<ServiceInfo> {
    let url = format!("http://{}:{}", state.local_address.get(), state.config.server.port);

    Ok(ApiResponse::success(ServiceInfo {
        name: "QR Feedback API",
        version: env!("CARGO_PKG_VERSION"),
        message: format!("API is running on: {}", url),
        url,
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let backend = state.store.backend_name();

    match state.store.health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": Utc::now(),
            "store": backend,
        }))),
        Err(e) => {
            tracing::error!("Health check failed for {} store: {}", backend, e);
            Err(ApiError::service_unavailable("Store unavailable"))
        }
    }
}
