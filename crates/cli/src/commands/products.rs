//! Catalog product commands.

use clap::Args;
use tracing::info;

use dendy_food_core::{Product, ProductId, ProductInput, format_amount};
use dendy_food_storefront::db::CatalogStore;

/// Fields for `products add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Uzbek name
    #[arg(long)]
    pub name_uz: String,

    /// Russian name
    #[arg(long)]
    pub name_ru: String,

    /// Price in whole so'm
    #[arg(long)]
    pub price: f64,

    /// Category key (e.g. Burger, Drink)
    #[arg(long)]
    pub category: String,

    /// Discount percent (1-100)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Image path or URL
    #[arg(long)]
    pub image: Option<String>,
}

impl From<AddArgs> for ProductInput {
    fn from(args: AddArgs) -> Self {
        Self {
            name_uz: Some(args.name_uz),
            name_ru: Some(args.name_ru),
            price: Some(args.price),
            category: Some(args.category),
            discount: args.discount,
            description: args.description,
            image: args.image,
        }
    }
}

/// One line per product: id, names, category, prices.
#[must_use]
pub fn summary_line(product: &Product) -> String {
    let mut line = format!(
        "{}  {} / {}  [{}]  {} so'm",
        product.id,
        product.name_uz,
        product.name_ru,
        product.category,
        format_amount(product.price.into()),
    );
    if let Some(discount) = product.discount {
        line.push_str(&format!(
            " (-{}% = {} so'm)",
            discount.percent(),
            format_amount(product.effective_price())
        ));
    }
    line
}

/// List every product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub async fn list(store: &CatalogStore) -> Result<(), Box<dyn std::error::Error>> {
    let products = store.list_products().await?;
    info!("{} product(s)", products.len());
    for product in &products {
        info!("{}", summary_line(product));
    }
    Ok(())
}

/// Validate and add a product.
///
/// # Errors
///
/// Returns an error if the fields are invalid or the catalog cannot be
/// written.
pub async fn add(store: &CatalogStore, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let product = store.create_product(args.into()).await?;
    info!("Added {}", summary_line(&product));
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if no product has `id` or the catalog cannot be written.
pub async fn delete(store: &CatalogStore, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.delete_product(&ProductId::new(id)).await?;
    info!(product_id = %id, "Deleted");
    Ok(())
}
