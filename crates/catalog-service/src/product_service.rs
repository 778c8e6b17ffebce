//! Product service trait definition.

use crate::dto::{CreateProductRequest, ProductDetailResponse, UpdateProductRequest};
use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface, ProductId};

/// Product use cases.
///
/// Requests are expected to be validated by the caller.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Creates a product and returns its ID.
    async fn create_product(&self, request: CreateProductRequest) -> CatalogResult<ProductId>;

    /// Gets a product detail, served from the cache when possible.
    ///
    /// `Ok(None)` means no product has this ID.
    async fn get_product_detail(&self, id: ProductId) -> CatalogResult<Option<ProductDetailResponse>>;

    /// Writes the fields present in `request`.
    ///
    /// Fails with `NotFound` when no product has this ID.
    async fn update_product(&self, id: ProductId, request: UpdateProductRequest) -> CatalogResult<()>;

    /// Deletes a product. Fails with `NotFound` when nothing was deleted.
    async fn delete_product(&self, id: ProductId) -> CatalogResult<()>;
}
