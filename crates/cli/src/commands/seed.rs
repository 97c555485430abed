//! Seed the catalog from a YAML file.
//!
//! The file is a list of products using the same camelCase keys as the JSON
//! API:
//!
//! ```yaml
//! - nameUz: Chizburger
//!   nameRu: Чизбургер
//!   price: 30000
//!   category: Burger
//!   discount: 10
//! ```
//!
//! Every entry is validated before anything is written, so a bad file
//! leaves the catalog untouched.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use dendy_food_core::{ProductInput, ValidationError};
use dendy_food_storefront::db::{CatalogError, CatalogStore};

/// Errors seeding the catalog.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed file is not a YAML product list: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid product entries in seed file: {}", .0.len())]
    Invalid(Vec<(usize, ValidationError)>),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parse and validate every entry of a seed document.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed YAML or `SeedError::Invalid`
/// listing each rejected entry by position (1-based).
pub fn parse_seed(content: &str) -> Result<Vec<ProductInput>, SeedError> {
    let entries: Vec<ProductInput> = serde_yaml::from_str(content)?;

    let invalid: Vec<_> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| entry.clone().validate().err().map(|e| (i + 1, e)))
        .collect();
    if !invalid.is_empty() {
        return Err(SeedError::Invalid(invalid));
    }
    Ok(entries)
}

/// Create every product in `content`, in order.
///
/// # Errors
///
/// Returns an error if the document is invalid (nothing is written) or the
/// catalog cannot be written.
pub async fn seed_catalog(store: &CatalogStore, content: &str) -> Result<usize, SeedError> {
    let entries = parse_seed(content)?;
    let count = entries.len();
    for entry in entries {
        store.create_product(entry).await?;
    }
    Ok(count)
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, any entry is invalid, or
/// the catalog cannot be written.
pub async fn from_file(store: &CatalogStore, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Loading products from file");
    let content = tokio::fs::read_to_string(path).await.map_err(SeedError::Io)?;

    match seed_catalog(store, &content).await {
        Ok(count) => {
            info!("Seeding complete: {count} product(s) added");
            Ok(())
        }
        Err(SeedError::Invalid(entries)) => {
            error!("Seed file validation failed:");
            for (position, err) in &entries {
                error!("  - entry {position}: {err}");
            }
            Err(SeedError::Invalid(entries).into())
        }
        Err(e) => Err(e.into()),
    }
}
