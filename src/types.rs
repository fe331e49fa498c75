/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Advisor role as persisted in the store and carried in token claims.
/// The store copy is authoritative; the token copy is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Advisor,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Advisor => "advisor",
            Role::Manager => "manager",
        }
    }

    /// Roles that bypass the ownership policy
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected 'advisor' or 'manager')")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "advisor" => Ok(Role::Advisor),
            "manager" => Ok(Role::Manager),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("advisor".parse::<Role>().unwrap(), Role::Advisor);
        assert_eq!(" manager ".parse::<Role>().unwrap(), Role::Manager);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
        let role: Role = serde_json::from_str("\"advisor\"").unwrap();
        assert_eq!(role, Role::Advisor);
    }

    #[test]
    fn only_manager_is_privileged() {
        assert!(Role::Manager.is_privileged());
        assert!(!Role::Advisor.is_privileged());
    }
}
