//! Order placement route.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use dendy_food_core::{Locale, OrderData, PaymentMethod};

use super::products::json_body;
use crate::error::Result;
use crate::models::session::{load_cart, mark_order_placed, store_cart};
use crate::services::place_order;
use crate::state::AppState;

/// Checkout form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRequest {
    pub delivery_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub customer_phone: Option<String>,
    pub language: Locale,
}

/// Confirmation returned to the customer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub message: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub item_count: u32,
}

/// Place an order for the session's cart.
///
/// The cart is cleared only when the notification was delivered. A second
/// submission from the same session while one is in flight gets 409.
#[instrument(skip(state, session, payload))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderConfirmation>> {
    let request = json_body(payload)?;
    let orders = &state.config().orders;

    let address = request
        .delivery_address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(orders.default_delivery_address.as_str());
    let order = OrderData::new(
        address,
        request.payment_method,
        request.customer_phone.as_deref(),
    );

    // A session without an id has never stored a cart, so there is nothing
    // to guard; `place_order` rejects it as empty.
    let _in_flight = session
        .id()
        .map(|id| state.orders_in_flight().begin(id.to_string()))
        .transpose()?;

    let mut cart = load_cart(&session).await?;
    let now = Utc::now();
    let placed_at = now.with_timezone(&orders.utc_offset).naive_local();
    let placed = place_order(
        state.notifier(),
        &mut cart,
        &order,
        request.language,
        placed_at,
    )
    .await?;

    store_cart(&session, &cart).await?;
    mark_order_placed(&session, now).await?;
    // Persist the emptied cart before the in-flight slot is released.
    session.save().await?;

    Ok(Json(OrderConfirmation {
        message: "Order placed",
        total: placed.total,
        item_count: placed.item_count,
    }))
}
