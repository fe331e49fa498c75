use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{AuthError, Claims};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::AdvisorStore;
use crate::types::Role;

/// Authenticated principal, resolved from the store on every request
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub advisor_id: Uuid,
    pub name: String,
    pub role: Role,
}

/// Bearer authentication: verify the token, then resolve the principal and
/// inject [`AuthUser`] into the request. Policies run after this layer.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = extract_bearer(request.headers())?;
        state.tokens.verify(token)?
    };

    let auth_user = resolve_principal(state.store.as_ref(), &claims).await?;
    tracing::debug!("Authenticated {} ({}) as {}", auth_user.name, auth_user.advisor_id, auth_user.role);

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Token from the Authorization header; the `Bearer ` prefix is optional
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;

    let value = header.to_str().map_err(|_| AuthError::InvalidCredential)?.trim();
    let token = value.strip_prefix("Bearer").map(str::trim).unwrap_or(value);

    if token.is_empty() {
        return Err(AuthError::InvalidCredential);
    }
    Ok(token)
}

/// Look up the advisor named by the claims. The role comes from the store
/// record; the role claim inside the token is ignored.
pub async fn resolve_principal(store: &dyn AdvisorStore, claims: &Claims) -> Result<AuthUser, ApiError> {
    let advisor = store.find_advisor(claims.advisor_id).await.map_err(|e| {
        tracing::error!("Failed to resolve principal {}: {}", claims.advisor_id, e);
        ApiError::internal_server_error("Failed to validate user")
    })?;

    let advisor = advisor.ok_or_else(|| {
        tracing::warn!("Token for unknown advisor {}", claims.advisor_id);
        AuthError::PrincipalNotFound
    })?;

    if let Some(claimed) = claims.role.filter(|claimed| *claimed != advisor.role) {
        tracing::info!(
            "Role for {} changed since token issue: token {}, store {}",
            advisor.id,
            claimed,
            advisor.role
        );
    }

    Ok(AuthUser {
        advisor_id: advisor.id,
        name: advisor.name,
        role: advisor.role,
    })
}
