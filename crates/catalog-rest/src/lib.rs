//! # Catalog REST
//!
//! HTTP layer for the catalog API: product and category endpoints, cache
//! health endpoints, Prometheus metrics and Swagger UI.

pub mod controllers;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
