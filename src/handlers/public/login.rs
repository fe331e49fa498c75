use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::auth::AuthError;
use crate::database::AdvisorSummary;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub advisor: AdvisorSummary,
}

/**
 * POST /api/advisors/login - exchange email and password for a bearer token
 *
 * Unknown email and wrong password produce the same 401 so the endpoint
 * does not reveal which advisors exist.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(body) = payload.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let advisor = state
        .store
        .find_advisor_by_email(&body.email)
        .await?
        .ok_or(AuthError::BadLogin)?;

    if !verify_password(&body.password, &advisor.password_hash) {
        tracing::warn!("Failed login for {}", advisor.email);
        return Err(AuthError::BadLogin.into());
    }

    let token = state.tokens.issue(advisor.id, advisor.role)?;
    tracing::info!("Advisor {} logged in as {}", advisor.id, advisor.role);

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: state.tokens.expiry_hours() * 3600,
        advisor: advisor.summary(),
    }))
}
