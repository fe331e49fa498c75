// handlers/mod.rs - three access tiers
//
// Public (no token) → Protected (token, own data unless manager) → Elevated (manager role)
pub mod elevated;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids that reach a handler have already passed policy checks, but
/// managers may still send garbage.
pub(crate) fn parse_advisor_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::field_error("advisorId", "Invalid Advisor ID format"))
}
