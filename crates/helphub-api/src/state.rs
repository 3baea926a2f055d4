//! Application state.

use helphub_db::Database;

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::services::AccountService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: Database,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(config: ApiConfig, db: Database) -> ApiResult<Self> {
        let accounts = AccountService::new(db.clone())?;
        Ok(Self {
            config,
            db,
            accounts,
        })
    }
}
