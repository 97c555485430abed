//! Session-related types.
//!
//! The cart lives entirely in the visitor's session; nothing about it is
//! persisted server-side beyond the session store.

use chrono::{DateTime, Utc};
use tower_sessions::Session;

use dendy_food_core::Cart;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the time the last order was placed from this session.
    pub const ORDER_PLACED_AT: &str = "order_placed_at";
}

/// Read the cart from the session, empty if none was stored yet.
///
/// # Errors
///
/// Returns error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the cart in the session.
///
/// # Errors
///
/// Returns error if the session store cannot be written.
pub async fn store_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// When this session last placed an order, if ever.
///
/// # Errors
///
/// Returns error if the session store cannot be read.
pub async fn order_placed_at(
    session: &Session,
) -> Result<Option<DateTime<Utc>>, tower_sessions::session::Error> {
    session.get::<DateTime<Utc>>(keys::ORDER_PLACED_AT).await
}

/// Record that this session just placed an order.
///
/// # Errors
///
/// Returns error if the session store cannot be written.
pub async fn mark_order_placed(
    session: &Session,
    at: DateTime<Utc>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::ORDER_PLACED_AT, at).await
}
