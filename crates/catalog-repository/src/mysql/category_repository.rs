//! MySQL category repository implementation.

use super::product_repository::last_insert_id;
use crate::{traits::CategoryRepository, DatabasePoolInterface};
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, Category, CategoryChanges, CategoryId, NewCategory};
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// MySQL category repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CategoryRepository)]
pub struct MySqlCategoryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlCategoryRepository {
    /// Creates a new MySQL category repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    parent_id: Option<i64>,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            parent_id: row.parent_id.map(CategoryId::new),
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn insert_query(category: &NewCategory) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new("INSERT INTO categories (name, parent_id, description) VALUES (");
    let mut values = qb.separated(", ");
    values.push_bind(category.name.as_str());
    values.push_bind(category.parent_id.map(CategoryId::into_inner));
    values.push_bind(category.description.as_str());
    qb.push(")");
    qb
}

fn update_query(id: CategoryId, changes: &CategoryChanges) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new("UPDATE categories SET name = ");
    qb.push_bind(changes.name.as_str());
    qb.push(", parent_id = ");
    qb.push_bind(changes.parent_id.map(CategoryId::into_inner));
    qb.push(", description = ");
    qb.push_bind(changes.description.as_str());
    qb.push(", updated_at = CURRENT_TIMESTAMP WHERE id = ");
    qb.push_bind(id.into_inner());
    qb
}

/// A `parent_id` naming no category trips `fk_categories_parent`.
fn parent_reference_error(err: sqlx::Error) -> CatalogError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            CatalogError::validation("Invalid parent category")
        }
        _ => err.into(),
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        debug!("Finding category by id: {}", id);

        let mut qb = QueryBuilder::<MySql>::new(
            "SELECT id, name, parent_id, description, created_at, updated_at FROM categories WHERE id = ",
        );
        qb.push_bind(id.into_inner());

        let row = qb
            .build_query_as::<CategoryRow>()
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Category::from))
    }

    async fn create(&self, category: &NewCategory) -> CatalogResult<CategoryId> {
        debug!("Creating category: {}", category.name);

        let result = insert_query(category)
            .build()
            .execute(self.pool.inner())
            .await
            .map_err(parent_reference_error)?;
        Ok(CategoryId::new(last_insert_id(result.last_insert_id())?))
    }

    async fn update(&self, id: CategoryId, changes: &CategoryChanges) -> CatalogResult<bool> {
        debug!("Updating category: {}", id);

        let result = update_query(id, changes)
            .build()
            .execute(self.pool.inner())
            .await
            .map_err(parent_reference_error)?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let mut qb = QueryBuilder::<MySql>::new("SELECT 1 FROM categories WHERE id = ");
        qb.push_bind(id.into_inner());
        let found: Option<i64> = qb.build_query_scalar().fetch_optional(self.pool.inner()).await?;
        Ok(found.is_some())
    }

    async fn delete(&self, id: CategoryId) -> CatalogResult<bool> {
        debug!("Deleting category: {}", id);

        let mut qb = QueryBuilder::<MySql>::new("DELETE FROM categories WHERE id = ");
        qb.push_bind(id.into_inner());

        let result = qb.build().execute(self.pool.inner()).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct ForeignKeyFailure;

    impl std::fmt::Display for ForeignKeyFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a foreign key constraint fails (CONSTRAINT `fk_categories_parent`)")
        }
    }

    impl StdError for ForeignKeyFailure {}

    impl DatabaseError for ForeignKeyFailure {
        fn message(&self) -> &str {
            "a foreign key constraint fails (CONSTRAINT `fk_categories_parent`)"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::ForeignKeyViolation
        }
    }

    #[test]
    fn test_missing_parent_maps_to_invalid_parent_category() {
        let err = parent_reference_error(sqlx::Error::Database(Box::new(ForeignKeyFailure)));

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Validation error: Invalid parent category");
    }

    #[test]
    fn test_other_errors_keep_the_default_mapping() {
        let err = parent_reference_error(sqlx::Error::PoolTimedOut);
        assert_eq!(err.error_code(), "TIMEOUT");
    }

    #[test]
    fn test_update_replaces_every_column() {
        let changes = CategoryChanges {
            name: "Tools".to_string(),
            parent_id: None,
            description: "Hand tools".to_string(),
        };
        let qb = update_query(CategoryId::new(1), &changes);
        assert_eq!(
            qb.sql(),
            "UPDATE categories SET name = ?, parent_id = ?, description = ?, \
             updated_at = CURRENT_TIMESTAMP WHERE id = ?"
        );
    }

    #[test]
    fn test_insert_query() {
        let category = NewCategory {
            name: "Tools".to_string(),
            parent_id: Some(CategoryId::new(1)),
            description: "Hand tools".to_string(),
        };
        assert_eq!(
            insert_query(&category).sql(),
            "INSERT INTO categories (name, parent_id, description) VALUES (?, ?, ?)"
        );
    }
}
