//! API configuration.

use std::time::Duration;

/// Credentials for an admin account created at startup when missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second
    pub rate_limit_rps: u32,
    /// Rate limit burst
    pub rate_limit_burst: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Serve `/metrics`
    pub metrics_enabled: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec!["http://localhost:8080".to_string()],
            rate_limit_rps: 20,
            rate_limit_burst: 40,
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            metrics_enabled: true,
            bootstrap_admin: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let rate_limit_rps = env_parse("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps);

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps,
            rate_limit_burst: env_parse("RATE_LIMIT_BURST").unwrap_or(rate_limit_rps * 2),
            request_timeout: Duration::from_secs(
                env_parse("REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout.as_secs()),
            ),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            bootstrap_admin: bootstrap_admin_from_env(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn bootstrap_admin_from_env() -> Option<BootstrapAdmin> {
    let email = std::env::var("BOOTSTRAP_ADMIN_EMAIL").ok()?;
    let password = std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?;
    if email.trim().is_empty() || password.is_empty() {
        return None;
    }

    Some(BootstrapAdmin {
        name: std::env::var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
        email: email.trim().to_string(),
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit_rps, 20);
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert_eq!(config.cors_origins, vec!["http://localhost:8080"]);
        assert!(!config.is_production());
    }
}
