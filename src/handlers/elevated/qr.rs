use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::QrRefreshReport;
use crate::state::AppState;

/// POST /api/advisors/qr/refresh - rewrite stale QR references now
pub async fn qr_refresh_post(State(state): State<AppState>) -> ApiResult<QrRefreshReport> {
    let report = state.qr.refresh_all().await?;
    Ok(ApiResponse::success(report))
}
