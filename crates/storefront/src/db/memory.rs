//! In-process catalog document.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dendy_food_core::Product;

use super::{CatalogBackend, StorageError};

/// Catalog document held in memory.
///
/// Clones share the same document, so a test can keep a handle and
/// inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    document: Arc<Mutex<Option<Vec<Product>>>>,
}

impl MemoryBackend {
    /// Start without a document, like a fresh install.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current document, `None` if nothing was written yet.
    pub async fn snapshot(&self) -> Option<Vec<Product>> {
        self.document.lock().await.clone()
    }
}

#[async_trait]
impl CatalogBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<Vec<Product>>, StorageError> {
        Ok(self.document.lock().await.clone())
    }

    async fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        *self.document.lock().await = Some(products.to_vec());
        Ok(())
    }
}
