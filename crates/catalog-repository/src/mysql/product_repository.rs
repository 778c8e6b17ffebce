//! MySQL product repository implementation.

use crate::{traits::ProductRepository, DatabasePoolInterface};
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, CategoryId, NewProduct, Product, ProductChanges, ProductId};
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const SELECT_PRODUCT: &str =
    "SELECT id, name, description, price, stock, category_id, created_at, updated_at FROM products";

/// MySQL product repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProductRepository)]
pub struct MySqlProductRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: ProductId) -> CatalogResult<bool> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT 1 FROM products WHERE id = ");
        qb.push_bind(id.into_inner());
        qb.push(" LIMIT 1");

        let found: Option<i64> = qb.build_query_scalar().fetch_optional(self.pool.inner()).await?;
        Ok(found.is_some())
    }
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    stock: i32,
    category_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            category_id: CategoryId::new(row.category_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn insert_query(product: &NewProduct) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new("INSERT INTO products (name, description, price, stock, category_id) VALUES (");
    let mut values = qb.separated(", ");
    values.push_bind(product.name.as_str());
    values.push_bind(product.description.as_str());
    values.push_bind(product.price);
    values.push_bind(product.stock);
    values.push_bind(product.category_id.into_inner());
    qb.push(")");
    qb
}

/// Builds an `UPDATE` that writes only the present fields.
fn update_query(id: ProductId, changes: &ProductChanges) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new("UPDATE products SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.name {
        set.push("name = ").push_bind_unseparated(name.as_str());
    }
    if let Some(description) = &changes.description {
        set.push("description = ").push_bind_unseparated(description.as_str());
    }
    if let Some(price) = changes.price {
        set.push("price = ").push_bind_unseparated(price);
    }
    if let Some(stock) = changes.stock {
        set.push("stock = ").push_bind_unseparated(stock);
    }
    if let Some(category_id) = changes.category_id {
        set.push("category_id = ").push_bind_unseparated(category_id.into_inner());
    }
    set.push("updated_at = CURRENT_TIMESTAMP");
    qb.push(" WHERE id = ");
    qb.push_bind(id.into_inner());
    qb
}

pub(crate) fn last_insert_id(raw: u64) -> CatalogResult<i64> {
    i64::try_from(raw).map_err(|_| CatalogError::internal(format!("Insert id {raw} out of range")))
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let mut qb = QueryBuilder::<MySql>::new(SELECT_PRODUCT);
        qb.push(" WHERE id = ");
        qb.push_bind(id.into_inner());

        let row = qb
            .build_query_as::<ProductRow>()
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Product::from))
    }

    async fn create(&self, product: &NewProduct) -> CatalogResult<ProductId> {
        debug!("Creating product: {}", product.name);

        let result = insert_query(product).build().execute(self.pool.inner()).await?;
        Ok(ProductId::new(last_insert_id(result.last_insert_id())?))
    }

    async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<bool> {
        debug!("Updating product: {}", id);

        if changes.is_empty() {
            return self.exists(id).await;
        }

        let result = update_query(id, changes).build().execute(self.pool.inner()).await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // Zero affected rows also happens when the values were already current.
        self.exists(id).await
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);

        let mut qb = QueryBuilder::<MySql>::new("DELETE FROM products WHERE id = ");
        qb.push_bind(id.into_inner());

        let result = qb.build().execute(self.pool.inner()).await?;
        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlProductRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlProductRepository").finish_non_exhaustive()
    }
}
