//! OpenAPI documentation served through Swagger UI.

use crate::controllers::health_controller::{CacheFlushResponse, CacheHealthResponse, CacheStatsResponse};
use catalog_core::FieldError;
use catalog_service::{
    CategoryDetailResponse, CreateCategoryRequest, CreateCategoryResponse, CreateProductRequest,
    CreateProductResponse, ProductDetailResponse, UpdateCategoryRequest, UpdateProductRequest,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the catalog API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = "Product and category management with a Redis read-through cache",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::get_product,
        crate::controllers::product_controller::update_product,
        crate::controllers::product_controller::delete_product,
        crate::controllers::category_controller::create_category,
        crate::controllers::category_controller::get_category,
        crate::controllers::category_controller::update_category,
        crate::controllers::category_controller::delete_category,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::cache_health,
        crate::controllers::health_controller::cache_stats,
        crate::controllers::health_controller::flush_cache,
    ),
    components(
        schemas(
            FieldError,
            CreateProductRequest,
            UpdateProductRequest,
            CreateProductResponse,
            ProductDetailResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateCategoryResponse,
            CategoryDetailResponse,
            CacheHealthResponse,
            CacheStatsResponse,
            CacheFlushResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "products", description = "Product management"),
        (name = "categories", description = "Category management"),
        (name = "health", description = "Liveness and cache health")
    )
)]
pub struct ApiDoc;

/// Registers the HTTP Basic scheme referenced by the `/api/v1` routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme("basic_auth", SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)));
        }
    }
}
