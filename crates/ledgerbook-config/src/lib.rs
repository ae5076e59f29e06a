//! Centralized configuration management for ledgerbook
//!
//! This crate provides a unified configuration system with type-safe,
//! validated configuration loaded from the environment.
//!
//! Configuration follows a simple hierarchy:
//! 1. Safe defaults (defined as constants)
//! 2. Environment variable overrides
//! 3. Runtime validation

pub mod error;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use validation::Validate;

// =============================================================================
// SAFE DEFAULTS - Work for any environment (dev, staging, prod, test)
// =============================================================================

// Database Configuration (safe local defaults)
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_NAME: &str = "ledgerbook";
const DEFAULT_DB_USER: &str = "ledgerbook";
const DEFAULT_DB_PASSWORD: &str = "localdev123";
const DEFAULT_DB_SSL_MODE: &str = "disable";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_MIN_CONNECTIONS: u32 = 2;
const DEFAULT_DB_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_DB_IDLE_TIMEOUT_SECONDS: u64 = 300;
const DEFAULT_AUTO_MIGRATE: bool = true;

// API Server Configuration
const DEFAULT_API_HOST: &str = "127.0.0.1"; // Localhost only for security
const DEFAULT_API_PORT: u16 = 3000;
const DEFAULT_API_TIMEOUT_SECONDS: u64 = 60;
// Advertised in HATEOAS links; deployments behind a proxy must override it.
const DEFAULT_API_PUBLIC_BASE_URL: &str = "http://127.0.0.1:3000";

// Telemetry Configuration
const DEFAULT_TRACING_LEVEL: &str = "info";
const DEFAULT_TELEMETRY_SERVICE_NAME: &str = "ledgerbook";
const DEFAULT_TELEMETRY_ENVIRONMENT: &str = "development";

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use std::time::Duration;

/// Core configuration for the entire ledgerbook application
///
/// All settings have safe defaults and can be overridden via environment
/// variables. No profile/environment selection needed - same defaults work
/// everywhere.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApplicationConfig {
    /// Database configuration
    pub database: DatabaseConfig,

    /// API server configuration
    pub api: ApiConfig,

    /// Telemetry and observability configuration
    pub telemetry: TelemetryConfig,
}

impl ApplicationConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            api: ApiConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}

impl Validate for ApplicationConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.database.validate()?;
        self.api.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

/// Database configuration - comprehensive `PostgreSQL` configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Username for authentication
    pub username: String,

    /// Password for authentication (use environment variables for security)
    pub password: String,

    /// SSL mode for connections ("disable", "prefer", "require")
    pub ssl_mode: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Minimum number of connections in pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub timeout_seconds: u64,

    /// Idle timeout in seconds
    pub idle_timeout_seconds: u64,

    /// Enable migrations on startup
    pub auto_migrate: bool,
}

impl DatabaseConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let host = std::env::var("LEDGERBOOK_DATABASE_HOST")
            .or_else(|_| std::env::var("DB_HOST"))
            .unwrap_or_else(|_| DEFAULT_DB_HOST.to_string());

        let port = std::env::var("LEDGERBOOK_DATABASE_PORT")
            .or_else(|_| std::env::var("DB_PORT"))
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DB_PORT);

        let database = std::env::var("LEDGERBOOK_DATABASE_NAME")
            .or_else(|_| std::env::var("DB_NAME"))
            .unwrap_or_else(|_| DEFAULT_DB_NAME.to_string());

        let username = std::env::var("LEDGERBOOK_DATABASE_USERNAME")
            .or_else(|_| std::env::var("DB_USER"))
            .unwrap_or_else(|_| DEFAULT_DB_USER.to_string());

        let password = std::env::var("LEDGERBOOK_DATABASE_PASSWORD")
            .or_else(|_| std::env::var("DB_PASSWORD"))
            .unwrap_or_else(|_| {
                tracing::warn!(
                    "Using default database password - set LEDGERBOOK_DATABASE_PASSWORD or DB_PASSWORD. NEVER use the default in production!"
                );
                DEFAULT_DB_PASSWORD.to_string()
            });

        let ssl_mode = std::env::var("LEDGERBOOK_DATABASE_SSL_MODE")
            .or_else(|_| std::env::var("DB_SSLMODE"))
            .unwrap_or_else(|_| DEFAULT_DB_SSL_MODE.to_string());

        let max_connections = std::env::var("LEDGERBOOK_DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);

        let min_connections = std::env::var("LEDGERBOOK_DATABASE_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DB_MIN_CONNECTIONS);

        let timeout_seconds = std::env::var("LEDGERBOOK_DATABASE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DB_TIMEOUT_SECONDS);

        let idle_timeout_seconds = std::env::var("LEDGERBOOK_DATABASE_IDLE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DB_IDLE_TIMEOUT_SECONDS);

        let auto_migrate = std::env::var("LEDGERBOOK_DATABASE_AUTO_MIGRATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_AUTO_MIGRATE);

        Self {
            host,
            port,
            database,
            username,
            password,
            ssl_mode,
            max_connections,
            min_connections,
            timeout_seconds,
            idle_timeout_seconds,
            auto_migrate,
        }
    }

    /// Convert string SSL mode to `PgSslMode`
    fn parse_ssl_mode(&self) -> PgSslMode {
        match self.ssl_mode.as_str() {
            "disable" => PgSslMode::Disable,
            "require" => PgSslMode::Require,
            _ => PgSslMode::Prefer, // Safe default for "prefer" and unknown values
        }
    }

    /// Build `PostgreSQL` connection options (no URL with password exposed!)
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(self.parse_ssl_mode())
    }

    /// Create a `PostgreSQL` connection pool with proper configuration
    ///
    /// # Errors
    /// Returns an error if connection to database fails
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.timeout_seconds))
            .idle_timeout(Duration::from_secs(self.idle_timeout_seconds))
            .connect_with(self.connect_options())
            .await
    }

    /// Get connection info for logging (NO PASSWORD!)
    pub fn safe_connection_string(&self) -> String {
        format!(
            "{}@{}:{}/{} (ssl: {:?})",
            self.username, self.host, self.port, self.database, self.ssl_mode
        )
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.host, "host")?;
        validation::validate_port(self.port, "port")?;
        validation::validate_non_empty(&self.database, "database")?;
        validation::validate_range(u64::from(self.max_connections), 1, 1000, "max_connections")?;
        validation::validate_range(self.timeout_seconds, 1, 3600, "timeout_seconds")?;
        Ok(())
    }
}

/// API server configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Externally visible base URL, used when building navigation links.
    /// Must match whatever clients actually reach (scheme + host + port).
    pub public_base_url: String,
}

impl ApiConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let host =
            std::env::var("LEDGERBOOK_API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.to_string());

        let port = std::env::var("LEDGERBOOK_API_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_PORT);

        let timeout_seconds = std::env::var("LEDGERBOOK_API_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECONDS);

        let public_base_url = std::env::var("LEDGERBOOK_API_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_PUBLIC_BASE_URL.to_string());

        Self {
            host,
            port,
            timeout_seconds,
            public_base_url,
        }
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.host, "host")?;
        validation::validate_port(self.port, "port")?;
        validation::validate_range(self.timeout_seconds, 1, 3600, "timeout_seconds")?;
        validation::validate_url(&self.public_base_url, "public_base_url")?;
        Ok(())
    }
}

/// Telemetry and observability configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetryConfig {
    /// Tracing level (trace, debug, info, warn, error)
    pub tracing_level: String,

    /// Service name for telemetry
    pub service_name: String,

    /// Environment label for telemetry
    pub environment: String,
}

impl TelemetryConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let tracing_level = std::env::var("LEDGERBOOK_TELEMETRY_TRACING_LEVEL")
            .unwrap_or_else(|_| DEFAULT_TRACING_LEVEL.to_string());

        let service_name = std::env::var("LEDGERBOOK_TELEMETRY_SERVICE_NAME")
            .unwrap_or_else(|_| DEFAULT_TELEMETRY_SERVICE_NAME.to_string());

        let environment = std::env::var("LEDGERBOOK_TELEMETRY_ENVIRONMENT")
            .unwrap_or_else(|_| DEFAULT_TELEMETRY_ENVIRONMENT.to_string());

        Self {
            tracing_level,
            service_name,
            environment,
        }
    }
}

impl Validate for TelemetryConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.service_name, "service_name")?;
        validation::validate_non_empty(&self.environment, "environment")?;

        match self.tracing_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Generic {
                message: format!("Invalid tracing level: {}", self.tracing_level),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = ApplicationConfig {
            database: DatabaseConfig {
                host: DEFAULT_DB_HOST.to_string(),
                port: DEFAULT_DB_PORT,
                database: DEFAULT_DB_NAME.to_string(),
                username: DEFAULT_DB_USER.to_string(),
                password: DEFAULT_DB_PASSWORD.to_string(),
                ssl_mode: DEFAULT_DB_SSL_MODE.to_string(),
                max_connections: DEFAULT_DB_MAX_CONNECTIONS,
                min_connections: DEFAULT_DB_MIN_CONNECTIONS,
                timeout_seconds: DEFAULT_DB_TIMEOUT_SECONDS,
                idle_timeout_seconds: DEFAULT_DB_IDLE_TIMEOUT_SECONDS,
                auto_migrate: DEFAULT_AUTO_MIGRATE,
            },
            api: ApiConfig {
                host: DEFAULT_API_HOST.to_string(),
                port: DEFAULT_API_PORT,
                timeout_seconds: DEFAULT_API_TIMEOUT_SECONDS,
                public_base_url: DEFAULT_API_PUBLIC_BASE_URL.to_string(),
            },
            telemetry: TelemetryConfig {
                tracing_level: DEFAULT_TRACING_LEVEL.to_string(),
                service_name: DEFAULT_TELEMETRY_SERVICE_NAME.to_string(),
                environment: DEFAULT_TELEMETRY_ENVIRONMENT.to_string(),
            },
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn safe_connection_string_hides_password() {
        let mut db = DatabaseConfig::from_env();
        db.password = "hunter2".to_string();
        assert!(!db.safe_connection_string().contains("hunter2"));
    }

    #[test]
    fn bad_tracing_level_is_rejected() {
        let telemetry = TelemetryConfig {
            tracing_level: "verbose".to_string(),
            service_name: "ledgerbook".to_string(),
            environment: "test".to_string(),
        };
        assert!(telemetry.validate().is_err());
    }
}
