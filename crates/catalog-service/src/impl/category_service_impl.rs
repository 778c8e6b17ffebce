//! Category service implementation.

use super::cache_aside;
use crate::cache::{cache_keys, CacheInterface};
use crate::dto::{CategoryDetailResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::CategoryService;
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, CategoryId};
use catalog_repository::CategoryRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Cache-aside category service.
#[derive(Component)]
#[shaku(interface = CategoryService)]
pub struct CategoryServiceImpl {
    #[shaku(inject)]
    repository: Arc<dyn CategoryRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl CategoryServiceImpl {
    /// Creates a new category service.
    #[must_use]
    pub fn new(repository: Arc<dyn CategoryRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { repository, cache }
    }

    async fn invalidate(&self, id: CategoryId) {
        let key = cache_keys::category(id);
        cache_aside::invalidate(self.cache.as_ref(), cache_keys::CATEGORY_PATTERN, Some(&key)).await;
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn create_category(&self, request: CreateCategoryRequest) -> CatalogResult<CategoryId> {
        let category = request.into_new_category()?;
        debug!("Creating category: {}", category.name);

        let id = self.repository.create(&category).await.inspect_err(|e| {
            error!(error = %e, "failed to create category");
        })?;

        cache_aside::invalidate(self.cache.as_ref(), cache_keys::CATEGORY_PATTERN, None).await;

        info!("Category created: {}", id);
        Ok(id)
    }

    async fn get_category_detail(&self, id: CategoryId) -> CatalogResult<Option<CategoryDetailResponse>> {
        let key = cache_keys::category(id);

        if let Some(cached) = cache_aside::lookup(self.cache.as_ref(), &key).await {
            return Ok(Some(cached));
        }

        let Some(category) = self.repository.find_by_id(id).await.inspect_err(|e| {
            error!(category_id = %id, error = %e, "failed to get category");
        })?
        else {
            return Ok(None);
        };

        let detail = CategoryDetailResponse::from(category);
        cache_aside::store(self.cache.as_ref(), &key, &detail).await;

        Ok(Some(detail))
    }

    async fn update_category(&self, id: CategoryId, request: UpdateCategoryRequest) -> CatalogResult<()> {
        debug!("Updating category: {}", id);
        let changes = request.into_changes()?;

        let updated = self.repository.update(id, &changes).await.inspect_err(|e| {
            error!(category_id = %id, error = %e, "failed to update category");
        })?;
        if !updated {
            return Err(CatalogError::not_found("Category", id));
        }

        self.invalidate(id).await;
        info!("Category updated: {}", id);
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        debug!("Deleting category: {}", id);

        let deleted = self.repository.delete(id).await.inspect_err(|e| {
            error!(category_id = %id, error = %e, "failed to delete category");
        })?;
        if !deleted {
            return Err(CatalogError::not_found("Category", id));
        }

        self.invalidate(id).await;
        info!("Category deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for CategoryServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use catalog_core::{Category, CategoryChanges, NewCategory};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        CategoryRepo {}

        #[async_trait]
        impl CategoryRepository for CategoryRepo {
            async fn find_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>>;
            async fn create(&self, category: &NewCategory) -> CatalogResult<CategoryId>;
            async fn update(&self, id: CategoryId, changes: &CategoryChanges) -> CatalogResult<bool>;
            async fn delete(&self, id: CategoryId) -> CatalogResult<bool>;
        }
    }

    fn tools(id: i64) -> Category {
        Category::from_new(
            CategoryId::new(id),
            NewCategory {
                name: "Tools".to_string(),
                parent_id: None,
                description: "Hand tools".to_string(),
            },
        )
    }

    fn replace_request() -> UpdateCategoryRequest {
        UpdateCategoryRequest {
            name: Some("Garden".to_string()),
            parent_id: Some(1),
            description: Some("Outdoor".to_string()),
        }
    }

    #[tokio::test]
    async fn test_read_through_populates_cache_once() {
        let mut repository = MockCategoryRepo::new();
        repository
            .expect_find_by_id()
            .with(eq(CategoryId::new(3)))
            .times(1)
            .returning(|id| Ok(Some(tools(id.into_inner()))));
        let cache = Arc::new(MemoryCache::default());
        let service = CategoryServiceImpl::new(Arc::new(repository), cache.clone());

        let first = service.get_category_detail(CategoryId::new(3)).await.unwrap();
        let second = service.get_category_detail(CategoryId::new(3)).await.unwrap();

        assert_eq!(first, second);
        assert!(cache.contains("category:3"));
    }

    #[tokio::test]
    async fn test_create_invalidates_categories_only() {
        let mut repository = MockCategoryRepo::new();
        repository.expect_create().returning(|_| Ok(CategoryId::new(8)));
        let cache = Arc::new(MemoryCache::default());
        cache.insert("category:1", "{}");
        cache.insert("product:1", "{}");
        let service = CategoryServiceImpl::new(Arc::new(repository), cache.clone());

        let id = service
            .create_category(CreateCategoryRequest {
                name: Some("Tools".to_string()),
                parent_id: None,
                description: Some("Hand tools".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(id, CategoryId::new(8));
        assert!(!cache.contains("category:1"));
        assert!(cache.contains("product:1"));
    }

    #[tokio::test]
    async fn test_update_replaces_and_invalidates() {
        let mut repository = MockCategoryRepo::new();
        repository
            .expect_update()
            .withf(|id, changes| {
                *id == CategoryId::new(2)
                    && changes.name == "Garden"
                    && changes.parent_id == Some(CategoryId::new(1))
            })
            .returning(|_, _| Ok(true));
        let cache = Arc::new(MemoryCache::default());
        cache.insert("category:2", "{}");
        let service = CategoryServiceImpl::new(Arc::new(repository), cache.clone());

        service.update_category(CategoryId::new(2), replace_request()).await.unwrap();

        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let mut repository = MockCategoryRepo::new();
        repository.expect_update().returning(|_, _| Ok(false));
        let service = CategoryServiceImpl::new(Arc::new(repository), Arc::new(MemoryCache::default()));

        let err = service
            .update_category(CategoryId::new(2), replace_request())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_then_read_is_not_found() {
        let mut repository = MockCategoryRepo::new();
        repository.expect_delete().returning(|_| Ok(true));
        repository.expect_find_by_id().returning(|_| Ok(None));
        let cache = Arc::new(MemoryCache::default());
        cache.insert("category:4", r#"{"id":4,"name":"Old","parentId":null,"description":""}"#);
        let service = CategoryServiceImpl::new(Arc::new(repository), cache.clone());

        service.delete_category(CategoryId::new(4)).await.unwrap();

        assert!(service.get_category_detail(CategoryId::new(4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_repository_error_is_not_a_miss() {
        let mut repository = MockCategoryRepo::new();
        repository
            .expect_find_by_id()
            .returning(|_| Err(CatalogError::Timeout("pool timed out".to_string())));
        let service = CategoryServiceImpl::new(Arc::new(repository), Arc::new(MemoryCache::default()));

        assert!(service.get_category_detail(CategoryId::new(1)).await.is_err());
    }
}
