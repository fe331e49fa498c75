// Customer feedback endpoints. The path form is what QR codes point at;
// /submit-feedback carries the advisor id in the body for older forms.

use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{FeedbackForm, FeedbackFormInfo, FeedbackReceipt};
use crate::state::AppState;

/// Feedback body accepted as either JSON or `application/x-www-form-urlencoded`
#[derive(Debug)]
pub struct FeedbackPayload(pub FeedbackForm);

#[async_trait]
impl<S> FromRequest<S> for FeedbackPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(form) = Json::<FeedbackForm>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
            Ok(Self(form))
        } else {
            let Form(form) = Form::<FeedbackForm>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            Ok(Self(form))
        }
    }
}

/// Media type comparison ignores case and parameters such as `charset`
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// GET /feedback/:advisorId
pub async fn form_get(
    State(state): State<AppState>,
    Path(advisor_id): Path<String>,
) -> ApiResult<FeedbackFormInfo> {
    let info = state.feedback.form(&advisor_id).await?;
    Ok(ApiResponse::success(info))
}

/// POST /api/feedback/submit/:advisorId
///
/// The path id wins over any `advisorId` field in the body.
pub async fn submit_post(
    State(state): State<AppState>,
    Path(advisor_id): Path<String>,
    FeedbackPayload(form): FeedbackPayload,
) -> ApiResult<FeedbackReceipt> {
    let receipt = state.feedback.submit(Some(&advisor_id), form).await?;
    Ok(ApiResponse::created(receipt))
}

/// POST /submit-feedback
pub async fn legacy_submit_post(
    State(state): State<AppState>,
    FeedbackPayload(form): FeedbackPayload,
) -> ApiResult<FeedbackReceipt> {
    let receipt = state.feedback.submit_from_body(form).await?;
    Ok(ApiResponse::created(receipt))
}
