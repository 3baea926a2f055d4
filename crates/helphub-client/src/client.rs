//! HelpHub REST API client.
//!
//! Reads retry on transport failures; mutations are sent exactly once.

use std::time::Duration;

use helphub_models::{
    AcceptBookingRequest, AdminDashboard, AdminProfile, AvailabilityMatrix, AvailabilityQuery,
    AvailableWorker, BookingDetails, CreateBookingRequest, CreateBookingResponse, LoginRequest,
    MessageResponse, Notification, Recipient, RegisterResponse, RegisterUserRequest,
    RegisterWorkerRequest, Role, Service, SetWorkerServicesRequest, UpdateAvailabilityRequest,
    UpdateUserProfile, UpdateWorkerProfile, UserProfile, UserSummary, WorkerDetails,
    WorkerProfile, WorkerSummary,
};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::retry::{with_retry, RetryConfig};
use crate::session::Session;

// =============================================================================
// Configuration
// =============================================================================

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root including the `/api` prefix
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration for reads
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("HELPHUB_API_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("HELPHUB_API_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retry: RetryConfig::from_env(),
            ..defaults
        }
    }

    /// Default settings against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// Client
// =============================================================================

/// HelpHub REST API client. Cheap to clone.
#[derive(Clone)]
pub struct HelpHubClient {
    http: Client,
    config: ClientConfig,
    base_url: String,
}

impl HelpHubClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("helphub-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let parsed = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {}: {e}", config.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ClientError::Config(format!(
                "base URL must be http(s) with a host: {}",
                config.base_url
            )));
        }
        let base_url = parsed.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            config,
            base_url,
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to `T`, or to [`ClientError::Api`] with the server's message.
    async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// GET with retries.
    async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        let url = url.as_str();

        with_retry(&self.config.retry, path, || async move {
            let mut request = self.http.get(url);
            if let Some(query) = query {
                request = request.query(query);
            }
            debug!(url = %url, "GET");
            Self::parse(request.send().await?).await
        })
        .await
    }

    /// Single-attempt request with an optional JSON body.
    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, url = %url, "Request");
        Self::parse(request.send().await?).await
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub async fn register_user(&self, req: &RegisterUserRequest) -> ClientResult<Session> {
        let response: RegisterResponse = self
            .send(Method::POST, "/users/register", Some(req))
            .await?;
        Ok(session_from_registration(Role::User, response, &req.email))
    }

    pub async fn register_worker(&self, req: &RegisterWorkerRequest) -> ClientResult<Session> {
        let response: RegisterResponse = self
            .send(Method::POST, "/workers/register", Some(req))
            .await?;
        Ok(session_from_registration(Role::Worker, response, &req.email))
    }

    pub async fn login_user(&self, email: &str, password: &str) -> ClientResult<Session> {
        let profile: UserProfile = self
            .send(Method::POST, "/users/login", Some(&credentials(email, password)))
            .await?;
        info!(user_id = profile.user_id, "Signed in");
        Ok(Session::user(&profile))
    }

    pub async fn login_worker(&self, email: &str, password: &str) -> ClientResult<Session> {
        let profile: WorkerProfile = self
            .send(Method::POST, "/workers/login", Some(&credentials(email, password)))
            .await?;
        info!(worker_id = profile.worker_id, "Signed in");
        Ok(Session::worker(&profile))
    }

    pub async fn login_admin(&self, email: &str, password: &str) -> ClientResult<Session> {
        let profile: AdminProfile = self
            .send(Method::POST, "/admins/login", Some(&credentials(email, password)))
            .await?;
        info!(admin_id = profile.admin_id, "Signed in");
        Ok(Session::admin(&profile))
    }

    /// End a session. The server keeps no session state, so this only drops it.
    pub fn logout(&self, session: Session) {
        info!(role = %session.role, id = session.id, "Signed out");
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    pub async fn user_profile(&self, session: &Session) -> ClientResult<UserProfile> {
        let user_id = session.require(Role::User)?;
        self.get(&format!("/users/{user_id}/profile"), None::<&()>)
            .await
    }

    pub async fn update_user_profile(
        &self,
        session: &Session,
        update: &UpdateUserProfile,
    ) -> ClientResult<UserProfile> {
        let user_id = session.require(Role::User)?;
        self.send(Method::PUT, &format!("/users/{user_id}/profile"), Some(update))
            .await
    }

    /// Any worker's public profile with services and availability.
    pub async fn worker_profile(&self, worker_id: i64) -> ClientResult<WorkerDetails> {
        self.get(&format!("/workers/{worker_id}/profile"), None::<&()>)
            .await
    }

    pub async fn update_worker_profile(
        &self,
        session: &Session,
        update: &UpdateWorkerProfile,
    ) -> ClientResult<WorkerProfile> {
        let worker_id = session.require(Role::Worker)?;
        self.send(Method::PUT, &format!("/workers/{worker_id}/profile"), Some(update))
            .await
    }

    // =========================================================================
    // Catalog and worker configuration
    // =========================================================================

    pub async fn services(&self) -> ClientResult<Vec<Service>> {
        self.get("/services", None::<&()>).await
    }

    pub async fn available_workers(
        &self,
        query: &AvailabilityQuery,
    ) -> ClientResult<Vec<AvailableWorker>> {
        self.get("/workers/available", Some(query)).await
    }

    pub async fn set_services(
        &self,
        session: &Session,
        req: &SetWorkerServicesRequest,
    ) -> ClientResult<MessageResponse> {
        let worker_id = session.require(Role::Worker)?;
        self.send(Method::POST, &format!("/workers/{worker_id}/services"), Some(req))
            .await
    }

    pub async fn set_availability(
        &self,
        session: &Session,
        availability: AvailabilityMatrix,
    ) -> ClientResult<MessageResponse> {
        let worker_id = session.require(Role::Worker)?;
        let body = UpdateAvailabilityRequest { availability };
        self.send(
            Method::POST,
            &format!("/workers/{worker_id}/availability"),
            Some(&body),
        )
        .await
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    /// Book as the session's user. `req.user_id` is overwritten.
    pub async fn book(
        &self,
        session: &Session,
        req: CreateBookingRequest,
    ) -> ClientResult<CreateBookingResponse> {
        let user_id = session.require(Role::User)?;
        let req = CreateBookingRequest { user_id, ..req };
        self.send(Method::POST, "/bookings", Some(&req)).await
    }

    pub async fn booking(&self, booking_id: i64) -> ClientResult<BookingDetails> {
        self.get(&format!("/bookings/{booking_id}"), None::<&()>)
            .await
    }

    pub async fn my_bookings(&self, session: &Session) -> ClientResult<Vec<BookingDetails>> {
        let user_id = session.require(Role::User)?;
        self.get(&format!("/users/{user_id}/bookings"), None::<&()>)
            .await
    }

    pub async fn my_requests(&self, session: &Session) -> ClientResult<Vec<BookingDetails>> {
        let worker_id = session.require(Role::Worker)?;
        self.get(&format!("/workers/{worker_id}/requests"), None::<&()>)
            .await
    }

    /// Accept a pending booking as the session's worker.
    pub async fn accept(&self, session: &Session, booking_id: i64) -> ClientResult<MessageResponse> {
        let worker_id = session.require(Role::Worker)?;
        self.send(
            Method::PUT,
            &format!("/bookings/{booking_id}/accept"),
            Some(&AcceptBookingRequest { worker_id }),
        )
        .await
    }

    pub async fn reject(&self, session: &Session, booking_id: i64) -> ClientResult<MessageResponse> {
        session.require(Role::Worker)?;
        self.send(Method::PUT, &format!("/bookings/{booking_id}/reject"), None::<&()>)
            .await
    }

    pub async fn notifications(&self, session: &Session) -> ClientResult<Vec<Notification>> {
        let path = match session.recipient() {
            Some(Recipient::User(id)) => format!("/users/{id}/notifications"),
            Some(Recipient::Worker(id)) => format!("/workers/{id}/notifications"),
            None => {
                return Err(ClientError::WrongRole {
                    expected: Role::User,
                    actual: session.role,
                })
            }
        };
        self.get(&path, None::<&()>).await
    }

    // =========================================================================
    // Admin reports
    // =========================================================================

    pub async fn dashboard(&self, session: &Session) -> ClientResult<AdminDashboard> {
        session.require(Role::Admin)?;
        self.get("/admin/dashboard", None::<&()>).await
    }

    pub async fn all_users(&self, session: &Session) -> ClientResult<Vec<UserSummary>> {
        session.require(Role::Admin)?;
        self.get("/admin/users", None::<&()>).await
    }

    pub async fn all_workers(&self, session: &Session) -> ClientResult<Vec<WorkerSummary>> {
        session.require(Role::Admin)?;
        self.get("/admin/workers", None::<&()>).await
    }

    pub async fn all_bookings(&self, session: &Session) -> ClientResult<Vec<BookingDetails>> {
        session.require(Role::Admin)?;
        self.get("/admin/bookings", None::<&()>).await
    }
}

fn credentials(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn session_from_registration(role: Role, response: RegisterResponse, email: &str) -> Session {
    Session {
        role,
        id: response.id().unwrap_or_default(),
        name: response.name,
        email: email.trim().to_string(),
        profile_pic: response.profile_pic,
    }
}
