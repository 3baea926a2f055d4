//! User, worker and admin account queries.

use chrono::Utc;
use helphub_models::account::non_blank;
use helphub_models::{
    AdminProfile, RegisterUserRequest, RegisterWorkerRequest, Role, UpdateUserProfile,
    UpdateWorkerProfile, UserProfile, WorkerDetails, WorkerProfile,
};
use tracing::info;

use crate::database::Database;
use crate::error::{violation, DbError, DbResult, Violation};
use crate::metrics::observe;

const USER_COLUMNS: &str = "user_id, name, email, phone, address, profile_pic, created_at";
const WORKER_COLUMNS: &str =
    "worker_id, name, email, phone, address, bio, profile_pic, avg_rating, created_at";
const ADMIN_COLUMNS: &str = "admin_id, name, email, profile_pic, created_at";

/// Stored password hash for an account, looked up by email.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: i64,
    pub password_hash: String,
}

fn duplicate_email(role: Role) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| match violation(&e) {
        Some(Violation::Unique) => {
            DbError::AlreadyExists(format!("{} with this email already exists", role.label()))
        }
        _ => e.into(),
    }
}

impl Database {
    // =========================================================================
    // Registration
    // =========================================================================

    /// Insert a user. Email uniqueness is enforced by the table.
    pub async fn create_user(
        &self,
        req: &RegisterUserRequest,
        password_hash: &str,
        profile_pic: &str,
    ) -> DbResult<i64> {
        observe("create_user", async {
            let result = sqlx::query(
                "INSERT INTO users (name, email, password, phone, address, profile_pic, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(req.name.trim())
            .bind(req.email.trim())
            .bind(password_hash)
            .bind(non_blank(req.phone.clone()))
            .bind(non_blank(req.address.clone()))
            .bind(profile_pic)
            .bind(Utc::now())
            .execute(self.pool())
            .await
            .map_err(duplicate_email(Role::User))?;

            let id = result.last_insert_rowid();
            info!(user_id = id, "User registered");
            Ok(id)
        })
        .await
    }

    /// Insert a worker. Email uniqueness is enforced by the table.
    pub async fn create_worker(
        &self,
        req: &RegisterWorkerRequest,
        password_hash: &str,
        profile_pic: &str,
    ) -> DbResult<i64> {
        observe("create_worker", async {
            let result = sqlx::query(
                "INSERT INTO workers (name, email, password, phone, address, bio, profile_pic, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(req.name.trim())
            .bind(req.email.trim())
            .bind(password_hash)
            .bind(req.phone.trim())
            .bind(non_blank(req.address.clone()))
            .bind(non_blank(req.bio.clone()))
            .bind(profile_pic)
            .bind(Utc::now())
            .execute(self.pool())
            .await
            .map_err(duplicate_email(Role::Worker))?;

            let id = result.last_insert_rowid();
            info!(worker_id = id, "Worker registered");
            Ok(id)
        })
        .await
    }

    /// Insert an admin unless one with `email` already exists.
    ///
    /// Returns `true` when a row was created.
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        profile_pic: &str,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "INSERT INTO admins (name, email, password, profile_pic, created_at) \
             VALUES (?, ?, ?, ?, ?) ON CONFLICT(email) DO NOTHING",
        )
        .bind(name)
        .bind(email.trim())
        .bind(password_hash)
        .bind(profile_pic)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Look up the id and password hash for an email within one role.
    pub async fn find_credentials(&self, role: Role, email: &str) -> DbResult<Option<Credentials>> {
        let sql = match role {
            Role::User => "SELECT user_id, password FROM users WHERE email = ?",
            Role::Worker => "SELECT worker_id, password FROM workers WHERE email = ?",
            Role::Admin => "SELECT admin_id, password FROM admins WHERE email = ?",
        };

        let row: Option<(i64, String)> = sqlx::query_as(sql)
            .bind(email.trim())
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|(id, password_hash)| Credentials { id, password_hash }))
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    pub async fn get_user(&self, user_id: i64) -> DbResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DbError::not_found("User not found"))
    }

    pub async fn get_worker(&self, worker_id: i64) -> DbResult<WorkerProfile> {
        sqlx::query_as::<_, WorkerProfile>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE worker_id = ?"
        ))
        .bind(worker_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DbError::not_found("Worker not found"))
    }

    pub async fn get_admin(&self, admin_id: i64) -> DbResult<AdminProfile> {
        sqlx::query_as::<_, AdminProfile>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE admin_id = ?"
        ))
        .bind(admin_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DbError::not_found("Admin not found"))
    }

    /// Worker profile with current services and availability rows.
    pub async fn get_worker_details(&self, worker_id: i64) -> DbResult<WorkerDetails> {
        let profile = self.get_worker(worker_id).await?;
        let services = self.worker_services(worker_id).await?;
        let availability = self.worker_availability(worker_id).await?;

        Ok(WorkerDetails {
            profile,
            services,
            availability,
        })
    }

    /// Replace the whitelisted user fields and return the refreshed row.
    pub async fn update_user(&self, user_id: i64, update: &UpdateUserProfile) -> DbResult<UserProfile> {
        observe("update_user", async {
            let result =
                sqlx::query("UPDATE users SET name = ?, phone = ?, address = ? WHERE user_id = ?")
                    .bind(update.name.trim())
                    .bind(non_blank(update.phone.clone()))
                    .bind(non_blank(update.address.clone()))
                    .bind(user_id)
                    .execute(self.pool())
                    .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("User not found"));
            }
            self.get_user(user_id).await
        })
        .await
    }

    /// Replace the whitelisted worker fields and return the refreshed row.
    pub async fn update_worker(
        &self,
        worker_id: i64,
        update: &UpdateWorkerProfile,
    ) -> DbResult<WorkerProfile> {
        observe("update_worker", async {
            let result = sqlx::query(
                "UPDATE workers SET name = ?, phone = ?, address = ?, bio = ? WHERE worker_id = ?",
            )
            .bind(update.name.trim())
            .bind(non_blank(update.phone.clone()))
            .bind(non_blank(update.address.clone()))
            .bind(non_blank(update.bio.clone()))
            .bind(worker_id)
            .execute(self.pool())
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Worker not found"));
            }
            self.get_worker(worker_id).await
        })
        .await
    }
}
