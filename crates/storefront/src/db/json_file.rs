//! Catalog document stored as a JSON file.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;

use dendy_food_core::Product;

use super::{CatalogBackend, StorageError};

/// Catalog persisted as a pretty-printed JSON array on disk.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// document, so readers never observe a half-written catalog.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CatalogBackend for JsonFileBackend {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Vec<Product>>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // An empty file is what a crashed external editor leaves behind;
        // treat it like a missing document.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    #[instrument(skip(self, products), fields(path = %self.path.display(), count = products.len()))]
    async fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(products)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dendy_food_core::{Discount, ProductFields, ProductId};

    fn temp_catalog() -> PathBuf {
        std::env::temp_dir()
            .join(format!("dendy-catalog-{}", uuid::Uuid::new_v4()))
            .join("data")
            .join("db.json")
    }

    fn product() -> Product {
        Product::from_fields(
            ProductId::new("p1"),
            ProductFields {
                name_uz: "Lavash".to_string(),
                name_ru: "Лаваш".to_string(),
                price: 28_000,
                category: "Sandwich".to_string(),
                discount: Discount::new(5),
                description: Some("Tovuqli".to_string()),
                image: None,
            },
        )
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let backend = JsonFileBackend::new(temp_catalog());
        assert!(backend.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs_and_round_trips() {
        let path = temp_catalog();
        let backend = JsonFileBackend::new(&path);

        backend.save(&[product()]).await.unwrap();
        assert!(path.exists());
        assert!(!backend.temp_path().exists());
        assert_eq!(backend.load().await.unwrap(), Some(vec![product()]));

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains("\"nameUz\": \"Lavash\""));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_empty_file_loads_as_none() {
        let path = temp_catalog();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"").await.unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(backend.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let path = temp_catalog();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(
            backend.load().await,
            Err(StorageError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_reads_legacy_documents() {
        let path = temp_catalog();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(
            &path,
            r#"[{"id":"1712345678901","nameUz":"Kola","nameRu":"Кола","price":8000,
                "category":"Drink","discount":0,"image":"/cola.png"}]"#,
        )
        .await
        .unwrap();

        let products = JsonFileBackend::new(&path).load().await.unwrap().unwrap();
        let cola = products.first().unwrap();
        assert_eq!(cola.id.as_str(), "1712345678901");
        assert_eq!(cola.discount, None);
        assert_eq!(cola.image.as_deref(), Some("/cola.png"));
    }
}
