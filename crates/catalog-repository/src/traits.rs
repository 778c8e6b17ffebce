//! Repository trait definitions.
//!
//! A missing row is never an error: lookups return `None` and mutations
//! report whether a row matched.

use async_trait::async_trait;
use catalog_core::{
    Category, CategoryChanges, CategoryId, CatalogResult, Interface, NewCategory, NewProduct, Product,
    ProductChanges, ProductId,
};

/// Product persistence.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Inserts a product and returns its new ID.
    async fn create(&self, product: &NewProduct) -> CatalogResult<ProductId>;

    /// Writes the present fields. Returns `false` when no product has `id`.
    async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<bool>;

    /// Deletes a product. Returns `false` when nothing was deleted.
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;
}

/// Category persistence.
#[async_trait]
pub trait CategoryRepository: Interface + Send + Sync {
    /// Finds a category by ID.
    async fn find_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>>;

    /// Inserts a category and returns its new ID.
    async fn create(&self, category: &NewCategory) -> CatalogResult<CategoryId>;

    /// Replaces name, description and parent. Returns `false` when no category has `id`.
    async fn update(&self, id: CategoryId, changes: &CategoryChanges) -> CatalogResult<bool>;

    /// Deletes a category. Returns `false` when nothing was deleted.
    async fn delete(&self, id: CategoryId) -> CatalogResult<bool>;
}
