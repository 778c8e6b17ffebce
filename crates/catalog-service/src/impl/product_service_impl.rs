//! Product service implementation.

use super::cache_aside;
use crate::cache::{cache_keys, CacheInterface};
use crate::dto::{CreateProductRequest, ProductDetailResponse, UpdateProductRequest};
use crate::ProductService;
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, ProductChanges, ProductId};
use catalog_repository::ProductRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, error, info};

const RESOURCE: &str = "Product";

/// Cache-aside product service.
#[derive(Component)]
#[shaku(interface = ProductService)]
pub struct ProductServiceImpl {
    #[shaku(inject)]
    repository: Arc<dyn ProductRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { repository, cache }
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn create_product(&self, request: CreateProductRequest) -> CatalogResult<ProductId> {
        let product = request.into_new_product()?;
        debug!("Creating product: {}", product.name);

        let id = self.repository.create(&product).await.inspect_err(|e| {
            error!(error = %e, "failed to create product");
        })?;

        cache_aside::invalidate(self.cache.as_ref(), cache_keys::PRODUCT_PATTERN, None).await;

        info!("Product created: {}", id);
        Ok(id)
    }

    async fn get_product_detail(&self, id: ProductId) -> CatalogResult<Option<ProductDetailResponse>> {
        let key = cache_keys::product(id);

        if let Some(cached) = cache_aside::lookup::<ProductDetailResponse>(self.cache.as_ref(), &key).await {
            return Ok(Some(cached));
        }

        let product = self.repository.find_by_id(id).await.inspect_err(|e| {
            error!(product_id = %id, error = %e, "failed to get product");
        })?;

        let Some(product) = product else {
            debug!("Product not found: {}", id);
            return Ok(None);
        };

        let detail = ProductDetailResponse::from(product);
        cache_aside::store(self.cache.as_ref(), &key, &detail).await;

        Ok(Some(detail))
    }

    async fn update_product(&self, id: ProductId, request: UpdateProductRequest) -> CatalogResult<()> {
        debug!("Updating product: {}", id);
        let changes = ProductChanges::from(request);

        let updated = self.repository.update(id, &changes).await.inspect_err(|e| {
            error!(product_id = %id, error = %e, "failed to update product");
        })?;
        if !updated {
            return Err(CatalogError::not_found(RESOURCE, id));
        }

        let key = cache_keys::product(id);
        cache_aside::invalidate(self.cache.as_ref(), cache_keys::PRODUCT_PATTERN, Some(&key)).await;

        info!("Product updated: {}", id);
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        debug!("Deleting product: {}", id);

        let deleted = self.repository.delete(id).await.inspect_err(|e| {
            error!(product_id = %id, error = %e, "failed to delete product");
        })?;
        if !deleted {
            return Err(CatalogError::not_found(RESOURCE, id));
        }

        let key = cache_keys::product(id);
        cache_aside::invalidate(self.cache.as_ref(), cache_keys::PRODUCT_PATTERN, Some(&key)).await;

        info!("Product deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use catalog_core::{NewProduct, Product};
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory product repository counting lookups.
    #[derive(Default)]
    struct InMemoryProductRepository {
        products: Mutex<HashMap<ProductId, Product>>,
        next_id: AtomicI64,
        lookups: AtomicUsize,
    }

    impl InMemoryProductRepository {
        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.products.lock().unwrap().get(&id).cloned())
        }

        async fn create(&self, product: &NewProduct) -> CatalogResult<ProductId> {
            let id = ProductId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            self.products
                .lock()
                .unwrap()
                .insert(id, Product::from_new(id, product.clone()));
            Ok(id)
        }

        async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<bool> {
            let mut products = self.products.lock().unwrap();
            match products.get_mut(&id) {
                Some(product) => {
                    changes.apply_to(product);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
            Ok(self.products.lock().unwrap().remove(&id).is_some())
        }
    }

    mock! {
        ProductRepo {}

        #[async_trait]
        impl ProductRepository for ProductRepo {
            async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;
            async fn create(&self, product: &NewProduct) -> CatalogResult<ProductId>;
            async fn update(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<bool>;
            async fn delete(&self, id: ProductId) -> CatalogResult<bool>;
        }
    }

    fn widget() -> CreateProductRequest {
        CreateProductRequest {
            name: Some("Widget".to_string()),
            description: Some("A widget".to_string()),
            price: Some(9.99),
            stock: Some(5),
            category_id: Some(1),
        }
    }

    fn setup() -> (ProductServiceImpl, Arc<InMemoryProductRepository>, Arc<MemoryCache>) {
        let repository = Arc::new(InMemoryProductRepository::default());
        let cache = Arc::new(MemoryCache::default());
        let service = ProductServiceImpl::new(repository.clone(), cache.clone());
        (service, repository, cache)
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let (service, _, _) = setup();

        let id = service.create_product(widget()).await.unwrap();
        assert!(id.into_inner() > 0);

        let detail = service.get_product_detail(id).await.unwrap().unwrap();
        assert_eq!(detail.name, "Widget");
        assert!((detail.price - 9.99).abs() < f64::EPSILON);
        assert_eq!(detail.stock, 5);
        assert_eq!(detail.category_id, 1);

        service
            .update_product(
                id,
                UpdateProductRequest {
                    price: Some(12.99),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let detail = service.get_product_detail(id).await.unwrap().unwrap();
        assert!((detail.price - 12.99).abs() < f64::EPSILON);
        assert_eq!(detail.name, "Widget");
    }

    #[tokio::test]
    async fn test_create_invalidates_pattern_without_populating() {
        let (service, _, cache) = setup();
        cache.insert("product:99", "{}");
        cache.insert("category:1", "{}");

        let id = service.create_product(widget()).await.unwrap();

        assert!(!cache.contains("product:99"));
        assert!(!cache.contains(&cache_keys::product(id)));
        assert!(cache.contains("category:1"));
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let (service, repository, cache) = setup();
        let id = service.create_product(widget()).await.unwrap();

        service.get_product_detail(id).await.unwrap();
        assert!(cache.contains(&cache_keys::product(id)));
        service.get_product_detail(id).await.unwrap();

        assert_eq!(repository.lookups(), 1);
    }

    #[tokio::test]
    async fn test_delete_invalidates() {
        let (service, _, cache) = setup();
        let id = service.create_product(widget()).await.unwrap();
        service.get_product_detail(id).await.unwrap();

        service.delete_product(id).await.unwrap();

        assert!(!cache.contains(&cache_keys::product(id)));
        assert!(service.get_product_detail(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let (service, _, cache) = setup();
        cache.insert("product:5", "{}");

        let err = service
            .update_product(ProductId::new(5), UpdateProductRequest::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = service.delete_product(ProductId::new(5)).await.unwrap_err();
        assert!(err.is_not_found());

        // Nothing was written, so nothing was invalidated.
        assert!(cache.contains("product:5"));
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_a_miss() {
        let (service, repository, cache) = setup();
        let id = service.create_product(widget()).await.unwrap();
        cache.insert(&cache_keys::product(id), "not json");

        let detail = service.get_product_detail(id).await.unwrap().unwrap();

        assert_eq!(detail.name, "Widget");
        assert_eq!(repository.lookups(), 1);
    }

    #[tokio::test]
    async fn test_cache_outage_does_not_fail_requests() {
        let repository = Arc::new(InMemoryProductRepository::default());
        let service = ProductServiceImpl::new(repository.clone(), Arc::new(MemoryCache::failing()));

        let id = service.create_product(widget()).await.unwrap();
        assert!(service.get_product_detail(id).await.unwrap().is_some());
        service.delete_product(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_product_is_none() {
        let (service, _, cache) = setup();
        assert!(service.get_product_detail(ProductId::new(42)).await.unwrap().is_none());
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_repository_failure_propagates_and_caches_nothing() {
        let mut repository = MockProductRepo::new();
        repository
            .expect_find_by_id()
            .returning(|_| Err(CatalogError::Database("connection reset".to_string())));
        let cache = Arc::new(MemoryCache::default());
        let service = ProductServiceImpl::new(Arc::new(repository), cache.clone());

        let err = service.get_product_detail(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CatalogError::Database(_)));
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let mut repository = MockProductRepo::new();
        repository
            .expect_update()
            .returning(|_, _| Err(CatalogError::Database("deadlock".to_string())));
        let cache = Arc::new(MemoryCache::default());
        cache.insert("product:1", "{}");
        let service = ProductServiceImpl::new(Arc::new(repository), cache.clone());

        let result = service
            .update_product(ProductId::new(1), UpdateProductRequest::default())
            .await;

        assert!(result.is_err());
        assert!(cache.contains("product:1"));
    }
}
