//! Catalog store: list, get, create, update and delete products.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use dendy_food_core::{Product, ProductId, ProductInput};

use super::{CatalogBackend, CatalogError, StorageError};

/// Owner of the canonical product list.
///
/// Construct one per process and share it (it is cheap to clone); all
/// operations are serialized through a single writer lock.
#[derive(Clone)]
pub struct CatalogStore {
    backend: Arc<dyn CatalogBackend>,
    lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore").finish_non_exhaustive()
    }
}

impl CatalogStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(backend: impl CatalogBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Every stored product, in catalog order.
    ///
    /// Creates an empty document if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the document cannot be read, or
    /// cannot be created when missing.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let _guard = self.lock.lock().await;
        Ok(self.load_or_init().await?)
    }

    /// Look up a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id, or
    /// `CatalogError::Storage` if the document cannot be read.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let _guard = self.lock.lock().await;
        self.load_or_init()
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Validate `input`, assign a fresh id, append and persist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad input (nothing is written)
    /// or `CatalogError::Storage` if the document cannot be read or written.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let fields = input.validate()?;
        let _guard = self.lock.lock().await;

        let mut products = self.load_or_init().await?;
        let mut id = ProductId::generate();
        while products.iter().any(|p| p.id == id) {
            id = ProductId::generate();
        }
        let product = Product::from_fields(id, fields);
        products.push(product.clone());
        self.backend.save(&products).await?;

        tracing::info!(product_id = %product.id, name = %product.name_uz, "Product created");
        Ok(product)
    }

    /// Replace the fields of an existing product, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad input,
    /// `CatalogError::NotFound` for an unknown id (nothing is written in
    /// either case), or `CatalogError::Storage` on I/O failure.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, CatalogError> {
        let fields = input.validate()?;
        let _guard = self.lock.lock().await;

        let mut products = self.load_or_init().await?;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        product.apply(fields);
        let updated = product.clone();
        self.backend.save(&products).await?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id (nothing is
    /// written), or `CatalogError::Storage` on I/O failure.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        let _guard = self.lock.lock().await;

        let mut products = self.load_or_init().await?;
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Err(CatalogError::NotFound(id.clone()));
        }
        self.backend.save(&products).await?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Read the document, writing an empty one first if it is missing.
    ///
    /// Callers must hold the lock.
    async fn load_or_init(&self) -> Result<Vec<Product>, StorageError> {
        if let Some(products) = self.backend.load().await? {
            return Ok(products);
        }
        tracing::info!("Catalog document missing, initializing empty catalog");
        self.backend.save(&[]).await?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryBackend;
    use dendy_food_core::Cart;

    fn burger(discount: Option<f64>) -> ProductInput {
        ProductInput {
            name_uz: Some("Burger".to_string()),
            name_ru: Some("Бургер".to_string()),
            price: Some(25_000.0),
            category: Some("Burger".to_string()),
            discount,
            ..ProductInput::default()
        }
    }

    /// Memory backend that yields between load and save, widening the
    /// window in which unserialized writers would lose updates.
    struct SlowBackend(MemoryBackend);

    #[async_trait]
    impl CatalogBackend for SlowBackend {
        async fn load(&self) -> Result<Option<Vec<Product>>, StorageError> {
            let products = self.0.load().await?;
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(products)
        }

        async fn save(&self, products: &[Product]) -> Result<(), StorageError> {
            self.0.save(products).await
        }
    }

    #[tokio::test]
    async fn test_list_initializes_missing_document() {
        let backend = MemoryBackend::new();
        let store = CatalogStore::new(backend.clone());
        assert!(backend.snapshot().await.is_none());

        assert!(store.list_products().await.unwrap().is_empty());
        assert_eq!(backend.snapshot().await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let store = CatalogStore::new(MemoryBackend::new());
        let created = store.create_product(burger(None)).await.unwrap();

        let products = store.list_products().await.unwrap();
        assert_eq!(products, vec![created.clone()]);
        assert_eq!(created.name_uz, "Burger");
        assert_eq!(created.name_ru, "Бургер");
        assert_eq!(created.price, 25_000);
        assert_eq!(created.discount, None);
        assert!(!created.id.as_str().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_writing() {
        let backend = MemoryBackend::new();
        let store = CatalogStore::new(backend.clone());
        store.list_products().await.unwrap();

        let err = store
            .create_product(ProductInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(backend.snapshot().await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_update_preserves_id() {
        let store = CatalogStore::new(MemoryBackend::new());
        let created = store.create_product(burger(None)).await.unwrap();

        let updated = store
            .update_product(&created.id, burger(Some(10.0)))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.effective_price(), Decimal::from(22_500));
        assert_eq!(store.list_products().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_and_changes_nothing() {
        let store = CatalogStore::new(MemoryBackend::new());
        store.create_product(burger(None)).await.unwrap();
        let before = store.list_products().await.unwrap();
        let unknown = ProductId::new("no-such-product");

        let err = store
            .update_product(&unknown, burger(Some(50.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref id) if id == &unknown));

        let err = store.delete_product(&unknown).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));

        let err = store.get_product(&unknown).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));

        assert_eq!(store.list_products().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let store = CatalogStore::new(MemoryBackend::new());
        let unknown = ProductId::new("no-such-product");

        let err = store
            .update_product(&unknown, ProductInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_only_product_leaves_catalog_empty() {
        let store = CatalogStore::new(MemoryBackend::new());
        let created = store.create_product(burger(None)).await.unwrap();

        store.delete_product(&created.id).await.unwrap();
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_persisted() {
        let store = CatalogStore::new(SlowBackend(MemoryBackend::new()));

        let (a, b) = tokio::join!(
            store.create_product(burger(None)),
            store.create_product(burger(Some(10.0)))
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.id, b.id);

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_product(burger(None)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let products = store.list_products().await.unwrap();
        assert_eq!(products.len(), 18);
        assert!(products.iter().any(|p| p.id == a.id));
        assert!(products.iter().any(|p| p.id == b.id));
    }

    #[tokio::test]
    async fn test_catalog_and_cart_scenario() {
        let store = CatalogStore::new(MemoryBackend::new());

        let plain = store.create_product(burger(None)).await.unwrap();
        assert_eq!(plain.discount, None);
        assert_eq!(plain.effective_price(), Decimal::from(25_000));

        let discounted = store.create_product(burger(Some(10.0))).await.unwrap();
        let mut cart = Cart::new();
        cart.add(&discounted);
        cart.add(&discounted);
        assert_eq!(cart.total_price(), Decimal::from(45_000));
    }
}
