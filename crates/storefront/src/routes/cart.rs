//! Cart route handlers.
//!
//! The cart is stored in the visitor's session. Adding a product copies a
//! snapshot of it from the catalog; later catalog edits do not change lines
//! already in the cart.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use dendy_food_core::order::is_recently_placed;
use dendy_food_core::{Cart, Locale, ProductId};

use super::menu::LangQuery;
use super::products::json_body;
use crate::error::{Result, add_breadcrumb};
use crate::models::session::{load_cart, order_placed_at, store_cart};
use crate::state::AppState;

/// Body of `/cart/add` and `/cart/remove`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    pub product_id: ProductId,
}

/// One cart line as shown to the customer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub item_count: u32,
    pub order_placed: bool,
}

impl CartView {
    /// Render `cart` in `lang`.
    #[must_use]
    pub fn new(cart: &Cart, lang: Locale, order_placed: bool) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    product_id: line.product().id.clone(),
                    name: line.product().name(lang).to_string(),
                    quantity: line.quantity(),
                    unit_price: line.unit_price(),
                    line_total: line.line_total(),
                })
                .collect(),
            total: cart.total_price(),
            item_count: cart.item_count(),
            order_placed,
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCount {
    pub item_count: u32,
}

/// Whether this session placed an order within the cool-down window.
async fn recently_placed(state: &AppState, session: &Session) -> Result<bool> {
    let window = TimeDelta::from_std(state.config().orders.placed_cooldown)
        .unwrap_or(TimeDelta::zero());
    Ok(order_placed_at(session)
        .await?
        .is_some_and(|at| is_recently_placed(at, Utc::now(), window)))
}

/// Display the cart.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LangQuery>,
) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    let placed = recently_placed(&state, &session).await?;
    Ok(Json(CartView::new(&cart, query.lang, placed)))
}

/// Add one unit of a catalog product.
#[instrument(skip(state, session, payload))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LangQuery>,
    payload: std::result::Result<Json<CartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let request = json_body(payload)?;
    let product = state.catalog().get_product(&request.product_id).await?;

    let mut cart = load_cart(&session).await?;
    cart.add(&product);
    store_cart(&session, &cart).await?;

    let data = [("product_id", product.id.as_str())];
    add_breadcrumb("cart", "Added to cart", Some(&data));
    let placed = recently_placed(&state, &session).await?;
    Ok(Json(CartView::new(&cart, query.lang, placed)))
}

/// Remove one unit of a product. Unknown products are ignored.
#[instrument(skip(state, session, payload))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LangQuery>,
    payload: std::result::Result<Json<CartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let request = json_body(payload)?;

    let mut cart = load_cart(&session).await?;
    cart.remove(&request.product_id);
    store_cart(&session, &cart).await?;

    let placed = recently_placed(&state, &session).await?;
    Ok(Json(CartView::new(&cart, query.lang, placed)))
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        item_count: cart.item_count(),
    }))
}
