//! User records and the payloads exchanged with a [`UserApi`](crate::UserApi).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uac_query::ListQuery;

/// Identifier of a user record.
pub type UserId = u64;

// =============================================================================
// UserStatus
// =============================================================================

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Blocked,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status label that is neither `active` nor `blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user status '{0}' (expected 'active' or 'blocked')")]
pub struct UnknownStatus(pub String);

impl FromStr for UserStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

// =============================================================================
// Records and payloads
// =============================================================================

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub status: UserStatus,
}

/// Payload for creating a user. The id is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub full_name: String,
    pub email: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl UserCreate {
    /// Create payload for `update`'s fields, stamped with `created_at`.
    pub fn from_update(update: UserUpdate, created_at: DateTime<Utc>) -> Self {
        Self {
            full_name: update.full_name,
            email: update.email,
            status: update.status,
            created_at,
        }
    }
}

/// Editable fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub full_name: String,
    pub email: String,
    pub status: UserStatus,
}

impl From<&User> for UserUpdate {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            status: user.status,
        }
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Parameters of a list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

impl From<&ListQuery> for ListRequest {
    fn from(query: &ListQuery) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            search: query.search.clone(),
        }
    }
}

impl Default for ListRequest {
    fn default() -> Self {
        Self::from(&ListQuery::default())
    }
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersPage {
    pub items: Vec<User>,
    /// Matches across all pages.
    pub total: usize,
    /// Page actually served.
    pub page: u32,
    /// Page size actually used.
    pub limit: u32,
}
