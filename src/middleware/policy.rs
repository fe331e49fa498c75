//! Per-route authorization policies.
//!
//! Both policies expect [`authenticate`](super::auth::authenticate) to have
//! run first and fail closed with 401 when no [`AuthUser`] is present.
use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::auth::AuthError;
use crate::error::ApiError;
use crate::types::Role;

pub const MANAGER_ONLY: &str = "Forbidden - Manager Access Only";
pub const OWN_DATA_ONLY: &str = "Forbidden - You can only access your own data";

/// Path parameter naming the advisor that owns the requested resource
pub const OWNER_PARAM: &str = "advisorId";

pub fn authorize_role(user: &AuthUser, required: Role) -> Result<(), AuthError> {
    if user.role == required {
        Ok(())
    } else {
        Err(AuthError::Forbidden(MANAGER_ONLY))
    }
}

pub fn authorize_owner(user: &AuthUser, owner_id: &str) -> Result<(), AuthError> {
    if user.role.is_privileged() {
        return Ok(());
    }
    match Uuid::parse_str(owner_id.trim()) {
        Ok(owner) if owner == user.advisor_id => Ok(()),
        _ => Err(AuthError::Forbidden(OWN_DATA_ONLY)),
    }
}

fn authenticated_user(request: &Request) -> Result<&AuthUser, ApiError> {
    request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

pub async fn require_manager(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = authenticated_user(&request)?;
    authorize_role(user, Role::Manager).map_err(|e| {
        tracing::warn!("Denied {} ({}): manager route", user.advisor_id, user.role);
        e
    })?;
    Ok(next.run(request).await)
}

pub async fn require_self_or_manager(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let owner_id = params.get(OWNER_PARAM).map(String::as_str).unwrap_or_default();
    let user = authenticated_user(&request)?;
    authorize_owner(user, owner_id).map_err(|e| {
        tracing::warn!("Denied {} ({}): resource of {}", user.advisor_id, user.role, owner_id);
        e
    })?;
    Ok(next.run(request).await)
}
