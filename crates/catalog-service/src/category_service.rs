//! Category service trait definition.

use crate::dto::{CategoryDetailResponse, CreateCategoryRequest, UpdateCategoryRequest};
use async_trait::async_trait;
use catalog_core::{CatalogResult, CategoryId, Interface};

/// Category use cases.
#[async_trait]
pub trait CategoryService: Interface + Send + Sync {
    /// Creates a category and returns its ID.
    async fn create_category(&self, request: CreateCategoryRequest) -> CatalogResult<CategoryId>;

    /// Gets a category detail. `Ok(None)` means no category has this ID.
    async fn get_category_detail(&self, id: CategoryId) -> CatalogResult<Option<CategoryDetailResponse>>;

    /// Replaces name, description and parent.
    async fn update_category(&self, id: CategoryId, request: UpdateCategoryRequest) -> CatalogResult<()>;

    /// Deletes a category.
    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()>;
}
