//! Customer-facing menu.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dendy_food_core::{Locale, Product, ProductId, category_label, group_by_category};

use crate::error::Result;
use crate::state::AppState;

/// `?lang=uz|ru`, Uzbek when absent.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Locale,
}

/// Menu as shown to customers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub lang: Locale,
    pub categories: Vec<MenuCategory>,
}

/// One category section.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub category: String,
    pub label: String,
    pub products: Vec<MenuItem>,
}

/// A product in the customer's language.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    #[serde(with = "rust_decimal::serde::float")]
    pub effective_price: Decimal,
}

impl MenuItem {
    fn new(product: &Product, lang: Locale) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name(lang).to_string(),
            description: product.description.clone(),
            image: product.image.clone(),
            price: product.price,
            discount: product.discount.map(|d| d.percent()),
            effective_price: product.effective_price(),
        }
    }
}

/// Build the menu for `lang` from the catalog.
#[must_use]
pub fn menu_view(products: &[Product], lang: Locale) -> MenuView {
    let categories = group_by_category(products)
        .into_iter()
        .map(|group| MenuCategory {
            category: group.category.to_string(),
            label: category_label(group.category, lang).to_string(),
            products: group
                .products
                .into_iter()
                .map(|p| MenuItem::new(p, lang))
                .collect(),
        })
        .collect();
    MenuView { lang, categories }
}

/// Catalog grouped by category, localized.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<MenuView>> {
    let products = state.catalog().list_products().await?;
    Ok(Json(menu_view(&products, query.lang)))
}
