//! Business logic services.

pub mod accounts;
pub mod password;

pub use accounts::AccountService;
