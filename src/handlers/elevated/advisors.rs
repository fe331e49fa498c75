use axum::extract::State;

use crate::database::AdvisorSummary;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/advisors
pub async fn advisor_list(State(state): State<AppState>) -> ApiResult<Vec<AdvisorSummary>> {
    let advisors = state.store.list_advisors().await?;
    Ok(ApiResponse::success(advisors.iter().map(|a| a.summary()).collect()))
}
