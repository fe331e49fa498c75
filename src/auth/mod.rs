use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::Role;

pub mod password;

/// Claims carried by every bearer token. `role` is informational: the
/// authoritative role is re-read from the store on each request, so a
/// missing or unrecognised role claim does not invalidate the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "advisorId")]
    pub advisor_id: Uuid,
    #[serde(default, deserialize_with = "lenient_role", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub exp: i64,
    pub iat: i64,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(|r| r.parse().ok()))
}

impl Claims {
    pub fn new(advisor_id: Uuid, role: Role, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            advisor_id,
            role: Some(role),
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Authentication and authorization failures. Each one ends the request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access Denied - No Token")]
    MissingCredential,
    #[error("Invalid Token")]
    InvalidCredential,
    #[error("Token Expired")]
    ExpiredCredential,
    #[error("User not found")]
    PrincipalNotFound,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("Invalid credentials")]
    BadLogin,
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

/// Signs and verifies HS256 tokens with the shared secret
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry_hours: u64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_hours,
        })
    }

    pub fn expiry_hours(&self) -> u64 {
        self.expiry_hours
    }

    pub fn issue(&self, advisor_id: Uuid, role: Role) -> Result<String, AuthError> {
        self.sign(&Claims::new(advisor_id, role, self.expiry_hours))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry and return the decoded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
                _ => AuthError::InvalidCredential,
            })
    }
}
