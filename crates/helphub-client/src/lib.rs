//! Client for the HelpHub REST API.
//!
//! Identity is an explicit [`Session`] returned by login or registration and
//! passed to every call that acts on behalf of an account:
//!
//! ```no_run
//! # async fn demo() -> helphub_client::ClientResult<()> {
//! use helphub_client::HelpHubClient;
//!
//! let client = HelpHubClient::from_env()?;
//! let session = client.login_user("ann@example.com", "secret1").await?;
//! let bookings = client.my_bookings(&session).await?;
//! println!("{} has {} bookings", session.name, bookings.len());
//! client.logout(session);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod retry;
pub mod session;

pub use client::{ClientConfig, HelpHubClient};
pub use error::{ClientError, ClientResult};
pub use retry::RetryConfig;
pub use session::Session;
