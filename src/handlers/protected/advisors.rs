use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::database::{Advisor, PerformanceEntry};
use crate::error::ApiError;
use crate::handlers::parse_advisor_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PerformanceReport {
    pub advisor_id: Uuid,
    pub feedback_count: usize,
    pub average_rating: Option<f64>,
    pub entries: Vec<PerformanceEntry>,
}

async fn load_advisor(state: &AppState, raw_id: &str) -> Result<Advisor, ApiError> {
    let id = parse_advisor_id(raw_id)?;
    state
        .store
        .find_advisor(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Advisor not found"))
}

/// GET /api/advisors/:advisorId
pub async fn advisor_get(
    State(state): State<AppState>,
    Path(advisor_id): Path<String>,
) -> ApiResult<Advisor> {
    let advisor = load_advisor(&state, &advisor_id).await?;
    Ok(ApiResponse::success(advisor))
}

/// GET /api/advisors/:advisorId/performance
pub async fn performance_get(
    State(state): State<AppState>,
    Path(advisor_id): Path<String>,
) -> ApiResult<PerformanceReport> {
    let advisor = load_advisor(&state, &advisor_id).await?;

    Ok(ApiResponse::success(PerformanceReport {
        advisor_id: advisor.id,
        feedback_count: advisor.performance_data.len(),
        average_rating: advisor.average_rating(),
        entries: advisor.performance_data,
    }))
}
