//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SITE_API` prefix and nested values use double underscores as separators.
//!
//! Every section is optional. A missing inference binding or delivery setting
//! is reported by the endpoint that needs it, at request time, rather than
//! failing startup.
//!
//! # Example
//!
//! ```no_run
//! use site_api::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod contact;
mod email;
mod error;
mod server;

pub use ai::{AiConfig, DEFAULT_MODEL};
pub use contact::ContactConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Shared by the site API and the contact delivery worker; each binary reads
/// the sections it needs. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Inference binding configuration (Workers AI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Contact forwarding configuration (worker URL, shared token)
    #[serde(default)]
    pub contact: ContactConfig,

    /// Email configuration (Resend, from/to addresses)
    #[serde(default)]
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SITE_API` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SITE_API__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SITE_API__AI__MODEL=...` -> `ai.model = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SITE_API")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs structural validation only:
    /// - Port and timeout ranges
    /// - URL schemes
    /// - Email address shape for from/to
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.contact.validate()?;
        self.email.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SITE_API__SERVER__PORT",
        "SITE_API__SERVER__ENVIRONMENT",
        "SITE_API__AI__ACCOUNT_ID",
        "SITE_API__AI__API_TOKEN",
        "SITE_API__AI__MODEL",
        "SITE_API__AI__GATEWAY_ID",
        "SITE_API__CONTACT__WORKER_URL",
        "SITE_API__CONTACT__WORKER_TOKEN",
        "SITE_API__EMAIL__FROM",
        "SITE_API__EMAIL__TO",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_nothing_set() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(!config.ai.has_binding());
        assert!(config.contact.worker_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SITE_API__AI__ACCOUNT_ID", "acct-123");
        env::set_var("SITE_API__AI__API_TOKEN", "cf-token");
        env::set_var("SITE_API__AI__MODEL", "@cf/openai/gpt-oss-20b");
        env::set_var("SITE_API__CONTACT__WORKER_URL", "https://worker.example.com");
        env::set_var("SITE_API__CONTACT__WORKER_TOKEN", "shared");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.ai.has_binding());
        assert_eq!(config.ai.model(), "@cf/openai/gpt-oss-20b");
        assert_eq!(
            config.contact.worker_url().as_deref(),
            Some("https://worker.example.com")
        );
        assert_eq!(config.contact.worker_token().unwrap().expose_secret(), "shared");
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SITE_API__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SITE_API__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_validate_rejects_bad_email_address() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SITE_API__EMAIL__FROM", "nobody");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
