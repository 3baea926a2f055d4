//! Account types for users, workers and admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::availability::AvailabilityEntry;
use crate::catalog::OfferedService;
use crate::error::ModelError;

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

/// Account role. Each role has its own table and its own email namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Worker,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Worker => "worker",
            Role::Admin => "admin",
        }
    }

    /// Capitalised label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Worker => "Worker",
            Role::Admin => "Admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "worker" => Ok(Role::Worker),
            "admin" => Ok(Role::Admin),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generated avatar image URL for a display name.
pub fn avatar_url(name: &str) -> String {
    match url::Url::parse_with_params(
        AVATAR_BASE_URL,
        &[("name", name), ("background", "random"), ("color", "fff")],
    ) {
        Ok(url) => url.to_string(),
        Err(_) => AVATAR_BASE_URL.to_string(),
    }
}

/// Treat empty or whitespace-only optional strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Body of `POST /workers/register`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterWorkerRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Body of every `/login` route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration acknowledgement.
///
/// The id is reported under `user_id` or `worker_id` depending on the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<i64>,
    pub name: String,
    pub profile_pic: String,
}

impl RegisterResponse {
    pub fn new(role: Role, id: i64, name: impl Into<String>, profile_pic: impl Into<String>) -> Self {
        let (user_id, worker_id) = match role {
            Role::Worker => (None, Some(id)),
            _ => (Some(id), None),
        };
        Self {
            message: format!("{} registered successfully", role.label()),
            user_id,
            worker_id,
            name: name.into(),
            profile_pic: profile_pic.into(),
        }
    }

    /// Whichever id field is set.
    pub fn id(&self) -> Option<i64> {
        self.user_id.or(self.worker_id)
    }
}

/// A user row without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserProfile {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
}

/// A worker row without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WorkerProfile {
    pub worker_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub profile_pic: String,
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Worker profile joined with offered services and availability rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerDetails {
    #[serde(flatten)]
    pub profile: WorkerProfile,
    pub services: Vec<OfferedService>,
    pub availability: Vec<AvailabilityEntry>,
}

/// An admin row without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AdminProfile {
    pub admin_id: i64,
    pub name: String,
    pub email: String,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `PUT /users/:id/profile`. All whitelisted fields are replaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserProfile {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Body of `PUT /workers/:id/profile`. All whitelisted fields are replaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWorkerProfile {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}
