//! Application state for Axum handlers.

use axum::extract::FromRef;
use catalog_core::RequestValidator;
use catalog_service::{CacheInterface, CategoryService, ProductService};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub product_service: Arc<dyn ProductService>,
    pub category_service: Arc<dyn CategoryService>,
    pub cache: Arc<dyn CacheInterface>,
    pub validator: Arc<RequestValidator>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        product_service: Arc<dyn ProductService>,
        category_service: Arc<dyn CategoryService>,
        cache: Arc<dyn CacheInterface>,
        validator: Arc<RequestValidator>,
    ) -> Self {
        Self {
            product_service,
            category_service,
            cache,
            validator,
        }
    }

    /// Resolves the services from a Shaku module.
    pub fn from_module<M>(module: &M, validator: Arc<RequestValidator>) -> Self
    where
        M: Module
            + HasComponent<dyn ProductService>
            + HasComponent<dyn CategoryService>
            + HasComponent<dyn CacheInterface>,
    {
        Self::new(module.resolve(), module.resolve(), module.resolve(), validator)
    }
}

impl FromRef<AppState> for Arc<RequestValidator> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.validator)
    }
}
