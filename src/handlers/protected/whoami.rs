use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - the principal as resolved from the store
pub async fn whoami_get(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(user))
}
