//! Configuration loader with layered sources.

use crate::AppConfig;
use catalog_core::CatalogError;
use config::{Config, ConfigError, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Snapshot of process environment variables.
pub type EnvVars = HashMap<String, String>;

/// Configuration loader holding the resolved configuration.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `CATALOG__` prefix
    /// 5. Flat deployment variables (`DB_HOST`, `SERVER_PORT`, ...)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, CatalogError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        Self::with_env(config_dir, std::env::vars().collect())
    }

    /// Creates a loader that reads variables from `env` instead of the process.
    pub fn with_env(config_dir: impl Into<String>, env: EnvVars) -> Result<Self, CatalogError> {
        let config = load_config(&config_dir.into(), &env)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CatalogError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }
}

/// Loads configuration from `config_dir`, resolving variables from `env`.
fn load_config(config_dir: &str, env: &EnvVars) -> Result<AppConfig, CatalogError> {
    let environment = env
        .get("CATALOG_ENVIRONMENT")
        .cloned()
        .unwrap_or_else(|| "development".to_string());

    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder().set_override("app.environment", environment.clone()).map_err(config_error)?;

    for name in ["default", environment.as_str(), "local"] {
        let path = format!("{config_dir}/{name}.toml");
        if Path::new(&path).exists() {
            debug!("Loading config from: {}", path);
            builder = builder.add_source(File::with_name(&path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("CATALOG")
            .separator("__")
            .try_parsing(true)
            .source(Some(env.clone())),
    );

    for (key, value) in flat_env_overrides(env)? {
        builder = builder.set_override(key, value).map_err(config_error)?;
    }

    let app_config: AppConfig = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(config_error)?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// A single override produced from a flat variable.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl From<OverrideValue> for config::Value {
    fn from(value: OverrideValue) -> Self {
        match value {
            OverrideValue::Text(s) => s.into(),
            OverrideValue::Number(n) => n.into(),
            OverrideValue::Flag(b) => b.into(),
        }
    }
}

/// Maps flat deployment variables onto configuration keys.
///
/// Ports must be numeric; anything else is rejected as `invalid <VAR>`.
/// `JAEGER_AGENT_HOST`/`JAEGER_AGENT_PORT` enable span export to
/// `http://<host>:<port>` (default port 4317).
pub fn flat_env_overrides(env: &EnvVars) -> Result<Vec<(&'static str, OverrideValue)>, CatalogError> {
    const TEXT_VARS: [(&str, &str); 7] = [
        ("DB_HOST", "database.host"),
        ("DB_USER", "database.user"),
        ("DB_PASSWORD", "database.password"),
        ("DB_NAME", "database.name"),
        ("SERVER_ADDR", "server.host"),
        ("REDIS_HOST", "redis.host"),
        ("REDIS_PASSWORD", "redis.password"),
    ];
    const NUMERIC_VARS: [(&str, &str); 4] = [
        ("DB_PORT", "database.port"),
        ("SERVER_PORT", "server.port"),
        ("REDIS_PORT", "redis.port"),
        ("REDIS_DB", "redis.db"),
    ];

    let mut overrides = Vec::new();

    for (var, key) in TEXT_VARS {
        if let Some(value) = non_empty(env, var) {
            overrides.push((key, OverrideValue::Text(value.to_string())));
        }
    }

    for (var, key) in NUMERIC_VARS {
        if let Some(value) = non_empty(env, var) {
            overrides.push((key, OverrideValue::Number(parse_number(var, value)?)));
        }
    }

    if let Some(host) = non_empty(env, "JAEGER_AGENT_HOST") {
        let port = match non_empty(env, "JAEGER_AGENT_PORT") {
            Some(port) => parse_number("JAEGER_AGENT_PORT", port)?,
            None => 4317,
        };
        overrides.push(("observability.telemetry.enabled", OverrideValue::Flag(true)));
        overrides.push((
            "observability.telemetry.otlp_endpoint",
            OverrideValue::Text(format!("http://{host}:{port}")),
        ));
    }

    Ok(overrides)
}

fn non_empty<'a>(env: &'a EnvVars, var: &str) -> Option<&'a str> {
    env.get(var).map(String::as_str).filter(|v| !v.trim().is_empty())
}

fn parse_number(var: &str, value: &str) -> Result<i64, CatalogError> {
    value
        .trim()
        .parse::<u16>()
        .map(i64::from)
        .map_err(|_| CatalogError::configuration(format!("invalid {var}")))
}

/// Rejects configurations the server cannot start with.
pub fn validate_config(config: &AppConfig) -> Result<(), CatalogError> {
    if config.server.port == 0 {
        return Err(CatalogError::configuration("server.port must be non-zero"));
    }

    let db = &config.database;
    if db.host.is_empty() || db.name.is_empty() {
        return Err(CatalogError::configuration("database host and name are required"));
    }
    if db.port == 0 {
        return Err(CatalogError::configuration("database.port must be non-zero"));
    }
    if db.min_connections > db.max_connections {
        return Err(CatalogError::configuration(
            "database.min_connections cannot exceed database.max_connections",
        ));
    }

    if config.redis.enabled && config.redis.port == 0 {
        return Err(CatalogError::configuration("redis.port must be non-zero"));
    }

    if config.auth.username.is_empty() || config.auth.password.is_empty() {
        return Err(CatalogError::configuration("auth credentials must not be empty"));
    }

    let ratio = config.observability.telemetry.sampling_ratio;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(CatalogError::configuration(
            "observability.telemetry.sampling_ratio must be within [0, 1]",
        ));
    }

    if config.app.environment == "production" && config.auth.password == "password" {
        warn!("Using default basic auth password in production! This is a security risk.");
    }

    Ok(())
}

fn config_error(err: ConfigError) -> CatalogError {
    CatalogError::Configuration(err.to_string())
}
