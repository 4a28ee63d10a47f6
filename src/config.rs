// Application configuration loaded from the environment
// All secrets are validated once at startup; a missing value aborts boot

use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

/// Validated process configuration
///
/// Constructed once in `main` and handed to the clients that need it.
/// Handlers never read the environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
    /// Base URL of the hosted identity provider admin API
    pub identity_url: String,
    /// Service credential for identity provider admin calls
    pub identity_service_key: String,
    /// Base URL of the payment gateway
    pub payment_base_url: String,
    /// Merchant slug registered with the payment gateway
    pub payment_slug: String,
    /// API key for the payment gateway
    pub payment_api_key: String,
    /// Payment simulation is disabled when true
    pub production: bool,
    pub host: String,
    pub port: String,
}

impl Config {
    /// Load and validate configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            jwt_secret: require("JWT_SECRET")?,
            identity_url: require("IDENTITY_URL")?,
            identity_service_key: require("IDENTITY_SERVICE_KEY")?,
            payment_base_url: std::env::var("PAYMENT_BASE_URL")
                .unwrap_or_else(|_| "https://app.pakasir.com".to_string()),
            payment_slug: require("PAYMENT_SLUG")?,
            payment_api_key: require("PAYMENT_API_KEY")?,
            production: std::env::var("IS_PRODUCTION")
                .map(|v| v == "true")
                .unwrap_or(false),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: port()?,
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

/// PORT must be a valid TCP port; a typo should abort boot, not fail at bind
fn port() -> Result<String, ConfigError> {
    let value = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidVar {
            var: "PORT",
            message: format!("{}: {}", value, e),
        })?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use super::*;

    // The process environment is global, so tests that mutate it take this
    // lock to keep the harness's parallel runner from interleaving them
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_required_vars() {
        std::env::set_var("DATABASE_URL", "postgresql://test");
        std::env::set_var("JWT_SECRET", "secret");
        std::env::set_var("IDENTITY_URL", "https://identity.example.com");
        std::env::set_var("IDENTITY_SERVICE_KEY", "service-key");
        std::env::set_var("PAYMENT_SLUG", "test-shop");
        std::env::set_var("PAYMENT_API_KEY", "api-key");
        std::env::remove_var("PORT");
    }

    #[test]
    fn test_from_env_with_all_vars() {
        let _guard = env_guard();
        set_required_vars();
        let config = Config::from_env().unwrap();
        assert_eq!(config.payment_slug, "test-shop");
        assert_eq!(config.payment_base_url, "https://app.pakasir.com");
        assert_eq!(config.port, "8080");
        assert!(!config.production);
    }

    #[test]
    fn test_missing_var_fails_fast() {
        let _guard = env_guard();
        set_required_vars();
        std::env::remove_var("PAYMENT_API_KEY");
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::MissingVar("PAYMENT_API_KEY"))));
        std::env::set_var("PAYMENT_API_KEY", "api-key");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let _guard = env_guard();
        set_required_vars();
        std::env::set_var("PORT", "not-a-port");
        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidVar { var: "PORT", .. })
        ));
        std::env::remove_var("PORT");
    }
}
