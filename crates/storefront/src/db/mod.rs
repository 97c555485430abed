//! Catalog persistence.
//!
//! # Document: `data/db.json`
//!
//! The whole catalog is one JSON array of products. Every mutation reads
//! the entire document, changes it in memory and writes the entire document
//! back; there are no partial writes.
//!
//! ## Backends
//!
//! - [`JsonFileBackend`] - the document on disk (production, CLI)
//! - [`MemoryBackend`] - an in-process document (tests, tooling)
//!
//! # Concurrency
//!
//! [`CatalogStore`] runs every operation under one async mutex, so
//! read-modify-write cycles issued through the same store never interleave
//! and no update is lost. Two *processes* writing the same file (e.g. the
//! CLI while the server runs) are not coordinated: the last full-document
//! write wins.

pub mod catalog;
pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use dendy_food_core::{Product, ProductId, ValidationError};

pub use catalog::CatalogStore;
pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Failures reading or writing the catalog document.
///
/// A missing document is not an error; backends report it as `None`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document could not be read or written.
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document exists but is not a valid product array.
    #[error("catalog document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors surfaced by [`CatalogStore`] operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product input was missing or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No product has the requested id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The backing document could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Whole-document persistence for the catalog.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Read the entire document. `Ok(None)` means it does not exist yet.
    async fn load(&self) -> Result<Option<Vec<Product>>, StorageError>;

    /// Replace the entire document.
    async fn save(&self, products: &[Product]) -> Result<(), StorageError>;
}
