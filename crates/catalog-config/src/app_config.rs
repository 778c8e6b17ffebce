//! Application configuration structures.

use catalog_core::telemetry::{LoggingConfig, TelemetryConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// MySQL configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Basic auth credentials for the `/api/v1` routes.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging, metrics and tracing.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "catalog-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Grace period for draining connections on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Returns the bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the shutdown grace period as a Duration.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// MySQL configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Minimum connection pool size.
    pub min_connections: u32,
    /// Maximum connection pool size.
    pub max_connections: u32,
    /// Maximum lifetime of a pooled connection in seconds.
    pub max_lifetime_secs: u64,
    /// How long to wait for a free connection, in seconds.
    pub acquire_timeout_secs: u64,
    /// Apply pending migrations at startup.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "user".to_string(),
            password: "password".to_string(),
            name: "mydatabase".to_string(),
            min_connections: 5,
            max_connections: 10,
            max_lifetime_secs: 5,
            acquire_timeout_secs: 30,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// Returns the `mysql://` connection URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    /// Returns the max connection lifetime as a Duration.
    #[must_use]
    pub const fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    /// Returns the acquire timeout as a Duration.
    #[must_use]
    pub const fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    /// Empty means no AUTH.
    pub password: String,
    /// Logical database index.
    pub db: u8,
    /// Connection pool size.
    pub pool_size: usize,
    /// Startup ping timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Disable to run without a cache (every read goes to MySQL).
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: String::new(),
            db: 0,
            pool_size: 10,
            connect_timeout_secs: 5,
            enabled: true,
        }
    }
}

impl RedisConfig {
    /// Returns the `redis://` connection URL.
    #[must_use]
    pub fn url(&self) -> String {
        if self.password.is_empty() {
            format!("redis://{}:{}/{}", self.host, self.port, self.db)
        } else {
            format!("redis://:{}@{}:{}/{}", self.password, self.host, self.port, self.db)
        }
    }

    /// Returns the startup ping timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP Basic auth credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Prometheus exposition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
