//! Dependency injection module using Shaku.
//!
//! The pools are connected before the module is built and handed in as
//! component parameters; everything above them is resolved by injection.

use catalog_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlCategoryRepository,
    MySqlProductRepository,
};
use catalog_service::{CategoryServiceImpl, ProductServiceImpl, RedisCacheService, RedisCacheServiceParameters};
use shaku::module;
use std::sync::Arc;

module! {
    pub CatalogModule {
        components = [
            DatabasePool,
            RedisCacheService,
            MySqlProductRepository,
            MySqlCategoryRepository,
            ProductServiceImpl,
            CategoryServiceImpl,
        ],
        providers = [],
    }
}

/// Builds the module over already connected pools.
#[must_use]
pub fn build_module(db_pool: &DatabasePool, cache: &RedisCacheService) -> Arc<CatalogModule> {
    let module = CatalogModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters { pool: cache.pool() })
        .build();

    Arc::new(module)
}
