//! # Catalog Config
//!
//! Layered configuration for the catalog API: TOML files, `CATALOG__`
//! prefixed environment variables and the flat `DB_*` / `SERVER_*` /
//! `REDIS_*` / `JAEGER_*` variables used by existing deployments.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
