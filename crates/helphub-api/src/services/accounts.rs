//! Registration, login and profile updates for all three roles.

use std::sync::Arc;

use helphub_db::Database;
use helphub_models::{
    avatar_url, AdminProfile, LoginRequest, RegisterResponse, RegisterUserRequest,
    RegisterWorkerRequest, Role, UpdateUserProfile, UpdateWorkerProfile, UserProfile,
    WorkerProfile,
};
use tracing::{info, warn};
use validator::Validate;

use super::password;
use crate::config::BootstrapAdmin;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_login, record_registration};
use crate::security::{
    sanitize_line, sanitize_optional, MAX_ADDRESS_LENGTH, MAX_NAME_LENGTH, MAX_TEXT_LENGTH,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

const DUMMY_PASSWORD: &str = "helphub-timing-guard";

/// Account operations shared by the handlers.
#[derive(Clone)]
pub struct AccountService {
    db: Database,
    /// Verified against when the email is unknown, so both failures cost the same.
    dummy_hash: Arc<str>,
}

impl AccountService {
    /// Fails if the login timing guard cannot be hashed.
    pub fn new(db: Database) -> ApiResult<Self> {
        let dummy_hash = password::hash_password(DUMMY_PASSWORD)
            .map_err(|e| ApiError::internal(format!("timing guard hashing failed: {e}")))?;

        Ok(Self {
            db,
            dummy_hash: dummy_hash.into(),
        })
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub async fn register_user(&self, req: RegisterUserRequest) -> ApiResult<RegisterResponse> {
        let req = RegisterUserRequest {
            name: sanitize_line(&req.name, MAX_NAME_LENGTH),
            email: req.email.trim().to_string(),
            password: req.password,
            phone: sanitize_optional(req.phone, MAX_NAME_LENGTH),
            address: sanitize_optional(req.address, MAX_ADDRESS_LENGTH),
        };
        req.validate()?;

        let hash = password::hash(req.password.clone()).await?;
        let profile_pic = avatar_url(&req.name);

        let user_id = self
            .db
            .create_user(&req, &hash, &profile_pic)
            .await
            .inspect_err(|_| record_registration(Role::User.as_str(), "rejected"))?;

        record_registration(Role::User.as_str(), "created");
        info!(user_id, "User registered");
        Ok(RegisterResponse::new(Role::User, user_id, req.name, profile_pic))
    }

    pub async fn register_worker(&self, req: RegisterWorkerRequest) -> ApiResult<RegisterResponse> {
        let req = RegisterWorkerRequest {
            name: sanitize_line(&req.name, MAX_NAME_LENGTH),
            email: req.email.trim().to_string(),
            password: req.password,
            phone: sanitize_line(&req.phone, MAX_NAME_LENGTH),
            address: sanitize_optional(req.address, MAX_ADDRESS_LENGTH),
            bio: sanitize_optional(req.bio, MAX_TEXT_LENGTH),
        };
        req.validate()?;

        let hash = password::hash(req.password.clone()).await?;
        let profile_pic = avatar_url(&req.name);

        let worker_id = self
            .db
            .create_worker(&req, &hash, &profile_pic)
            .await
            .inspect_err(|_| record_registration(Role::Worker.as_str(), "rejected"))?;

        record_registration(Role::Worker.as_str(), "created");
        info!(worker_id, "Worker registered");
        Ok(RegisterResponse::new(Role::Worker, worker_id, req.name, profile_pic))
    }

    /// Create the configured admin account if it does not exist yet.
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> ApiResult<()> {
        let hash = password::hash(admin.password.clone()).await?;
        let name = sanitize_line(&admin.name, MAX_NAME_LENGTH);

        let created = self
            .db
            .ensure_admin(&name, &admin.email, &hash, &avatar_url(&name))
            .await?;

        if created {
            info!(email = %admin.email, "Bootstrap admin created");
        }
        Ok(())
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Resolve the account id for `req`, failing identically for unknown
    /// emails and wrong passwords.
    async fn authenticate(&self, role: Role, req: &LoginRequest) -> ApiResult<i64> {
        let credentials = self.db.find_credentials(role, &req.email).await?;

        let (account_id, hash) = match credentials {
            Some(c) => (Some(c.id), c.password_hash),
            None => (None, self.dummy_hash.to_string()),
        };
        let valid = password::verify(req.password.clone(), hash).await?;

        match account_id {
            Some(id) if valid => {
                record_login(role.as_str(), true);
                Ok(id)
            }
            _ => {
                record_login(role.as_str(), false);
                warn!(role = %role, known = account_id.is_some(), "Login failed");
                Err(ApiError::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    pub async fn login_user(&self, req: &LoginRequest) -> ApiResult<UserProfile> {
        let user_id = self.authenticate(Role::User, req).await?;
        Ok(self.db.get_user(user_id).await?)
    }

    pub async fn login_worker(&self, req: &LoginRequest) -> ApiResult<WorkerProfile> {
        let worker_id = self.authenticate(Role::Worker, req).await?;
        Ok(self.db.get_worker(worker_id).await?)
    }

    pub async fn login_admin(&self, req: &LoginRequest) -> ApiResult<AdminProfile> {
        let admin_id = self.authenticate(Role::Admin, req).await?;
        Ok(self.db.get_admin(admin_id).await?)
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    pub async fn update_user(
        &self,
        user_id: i64,
        update: UpdateUserProfile,
    ) -> ApiResult<UserProfile> {
        let update = UpdateUserProfile {
            name: sanitize_line(&update.name, MAX_NAME_LENGTH),
            phone: sanitize_optional(update.phone, MAX_NAME_LENGTH),
            address: sanitize_optional(update.address, MAX_ADDRESS_LENGTH),
        };
        update.validate()?;

        Ok(self.db.update_user(user_id, &update).await?)
    }

    pub async fn update_worker(
        &self,
        worker_id: i64,
        update: UpdateWorkerProfile,
    ) -> ApiResult<WorkerProfile> {
        let update = UpdateWorkerProfile {
            name: sanitize_line(&update.name, MAX_NAME_LENGTH),
            phone: sanitize_optional(update.phone, MAX_NAME_LENGTH),
            address: sanitize_optional(update.address, MAX_ADDRESS_LENGTH),
            bio: sanitize_optional(update.bio, MAX_TEXT_LENGTH),
        };
        update.validate()?;

        Ok(self.db.update_worker(worker_id, &update).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> AccountService {
        AccountService::new(Database::open_in_memory().await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_timing_guard_is_a_real_hash() {
        let accounts = service().await;
        assert!(accounts.dummy_hash.starts_with("$argon2id$"));
        assert!(password::verify_password(DUMMY_PASSWORD, &accounts.dummy_hash).unwrap());
        assert!(!password::verify_password("secret1", &accounts.dummy_hash).unwrap());
    }

    fn user_request(email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: "  Ann Lee ".into(),
            email: email.into(),
            password: "secret1".into(),
            phone: Some("   ".into()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let accounts = service().await;

        let registered = accounts.register_user(user_request("ann@example.com")).await.unwrap();
        assert_eq!(registered.name, "Ann Lee");
        assert_eq!(registered.message, "User registered successfully");

        let login = LoginRequest {
            email: "ann@example.com".into(),
            password: "secret1".into(),
        };
        let profile = accounts.login_user(&login).await.unwrap();
        assert_eq!(Some(profile.user_id), registered.id());
        assert_eq!(profile.phone, None);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let accounts = service().await;
        accounts.register_user(user_request("ann@example.com")).await.unwrap();

        let wrong_password = accounts
            .login_user(&LoginRequest {
                email: "ann@example.com".into(),
                password: "nope123".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = accounts
            .login_user(&LoginRequest {
                email: "bob@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.status_code(), unknown_email.status_code());
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_roles_have_separate_credentials() {
        let accounts = service().await;
        accounts.register_user(user_request("ann@example.com")).await.unwrap();

        let err = accounts
            .login_worker(&LoginRequest {
                email: "ann@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let accounts = service().await;
        let admin = BootstrapAdmin {
            name: "Root".into(),
            email: "root@example.com".into(),
            password: "changeme".into(),
        };

        accounts.ensure_bootstrap_admin(&admin).await.unwrap();
        accounts.ensure_bootstrap_admin(&admin).await.unwrap();

        let profile = accounts
            .login_admin(&LoginRequest {
                email: "root@example.com".into(),
                password: "changeme".into(),
            })
            .await
            .unwrap();
        assert_eq!(profile.name, "Root");
    }

    #[tokio::test]
    async fn test_blank_name_fails_validation() {
        let accounts = service().await;
        let mut req = user_request("ann@example.com");
        req.name = "  x  ".into();

        let err = accounts.register_user(req).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
