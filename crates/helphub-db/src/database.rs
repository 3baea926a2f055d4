//! SQLite connection pool and migrations.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::{DbError, DbResult};

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// sqlx connection URL, e.g. `sqlite://helphub.db`
    pub url: String,
    pub max_connections: u32,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://helphub.db".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl DbConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            url: std::env::var("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_connections),
            busy_timeout: std::env::var("DATABASE_BUSY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.busy_timeout),
        }
    }

    /// Config for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Handle to the marketplace database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect using `config` and apply pending migrations.
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DbError::Connection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let pool = if config.is_in_memory() {
            // Every connection to `:memory:` is a separate database, so keep
            // exactly one alive for the lifetime of the pool.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await
        }
        .map_err(|e| DbError::Connection(e.to_string()))?;

        info!(url = %config.url, "Database opened");

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Open (creating if needed) a database file.
    pub async fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DbError::Io(e.to_string()))?;
        }

        let config = DbConfig {
            url: format!("sqlite://{}", path.display()),
            ..DbConfig::default()
        };
        Self::connect(&config).await
    }

    /// Open a fresh in-memory database.
    pub async fn open_in_memory() -> DbResult<Self> {
        Self::connect(&DbConfig::in_memory()).await
    }

    async fn run_migrations(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Round-trip a trivial query. Used by readiness probes.
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.url, "sqlite://helphub.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_open_in_memory_runs_migrations() {
        let db = Database::open_in_memory().await.unwrap();
        db.ping().await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 6);
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("helphub.db");

        let db = Database::open(&path).await.unwrap();
        db.ping().await.unwrap();
        db.close().await;

        assert!(path.exists());

        // Reopening must not re-run applied migrations.
        let db = Database::open(&path).await.unwrap();
        db.ping().await.unwrap();
    }
}
