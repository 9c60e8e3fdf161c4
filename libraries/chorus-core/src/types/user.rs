//! User domain types
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// User role
///
/// Roles are fixed at account creation; there is no self-promotion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only visitor account
    Guest,
    /// Regular account, may upload songs and create playlists
    User,
    /// Administrator, bypasses ownership checks
    Admin,
}

impl Role {
    /// Convert role to string for database storage
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse role from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "guest" => Some(Role::Guest),
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// User account
///
/// The password hash is not part of this type; credentials live in their own
/// table and never leave the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Email address (unique)
    pub email: String,

    /// Account role
    pub role: Role,

    /// Account creation timestamp (unix seconds)
    pub created_at: i64,
}

/// Condensed user identity embedded in song and playlist payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Unique user identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}
