//! Signed-in identity held by the caller.

use helphub_models::{AdminProfile, Recipient, Role, UserProfile, WorkerProfile};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Who the client is acting as. Obtained from login or registration and
/// passed explicitly to identity-scoped calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub profile_pic: String,
}

impl Session {
    pub fn user(profile: &UserProfile) -> Self {
        Self {
            role: Role::User,
            id: profile.user_id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            profile_pic: profile.profile_pic.clone(),
        }
    }

    pub fn worker(profile: &WorkerProfile) -> Self {
        Self {
            role: Role::Worker,
            id: profile.worker_id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            profile_pic: profile.profile_pic.clone(),
        }
    }

    pub fn admin(profile: &AdminProfile) -> Self {
        Self {
            role: Role::Admin,
            id: profile.admin_id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            profile_pic: profile.profile_pic.clone(),
        }
    }

    /// The account id, if this session has `role`.
    pub fn require(&self, role: Role) -> ClientResult<i64> {
        if self.role == role {
            Ok(self.id)
        } else {
            Err(ClientError::WrongRole {
                expected: role,
                actual: self.role,
            })
        }
    }

    /// Notification recipient for this account. Admins receive none.
    pub fn recipient(&self) -> Option<Recipient> {
        match self.role {
            Role::User => Some(Recipient::User(self.id)),
            Role::Worker => Some(Recipient::Worker(self.id)),
            Role::Admin => None,
        }
    }
}
