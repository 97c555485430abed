//! Order placement.
//!
//! Turns a cart plus delivery details into a notification. The cart is
//! cleared only after the sink confirms delivery; any failure leaves it
//! exactly as it was so the customer can retry.
//!
//! At most one submission per session is in flight at a time; see
//! [`InFlightOrders`].

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use dendy_food_core::order::notification_text;
use dendy_food_core::{Cart, Locale, OrderData};

use super::notifier::{NotifyError, OrderNotifier};

/// Errors placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Nothing to order. Raised before any network call.
    #[error("cart is empty")]
    EmptyCart,

    /// Another submission for the same session has not finished yet.
    #[error("an order is already being submitted for this session")]
    InProgress,

    /// The notification sink failed or timed out.
    #[error("order submission failed: {0}")]
    Submission(#[from] NotifyError),
}

/// Summary of a successfully placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub total: Decimal,
    pub item_count: u32,
}

/// Sessions with an order submission in progress.
#[derive(Debug, Default)]
pub struct InFlightOrders {
    sessions: Mutex<HashSet<String>>,
}

impl InFlightOrders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the submission slot for `session_key`.
    ///
    /// The slot is released when the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InProgress` if the slot is already held.
    pub fn begin(&self, session_key: impl Into<String>) -> Result<InFlightGuard<'_>, OrderError> {
        let key = session_key.into();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if !sessions.insert(key.clone()) {
            return Err(OrderError::InProgress);
        }
        Ok(InFlightGuard { owner: self, key })
    }

    fn release(&self, key: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Held while one session's order is being submitted.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlightOrders,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.release(&self.key);
    }
}

/// Send the order to the notifier and clear the cart on success.
///
/// # Errors
///
/// Returns `OrderError::EmptyCart` without contacting the notifier if the
/// cart has no lines, or `OrderError::Submission` if delivery fails (the
/// cart is left untouched).
#[instrument(skip_all, fields(lines = cart.lines().len(), locale = locale.code()))]
pub async fn place_order(
    notifier: &dyn OrderNotifier,
    cart: &mut Cart,
    order: &OrderData,
    locale: Locale,
    placed_at: NaiveDateTime,
) -> Result<PlacedOrder, OrderError> {
    if cart.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let placed = PlacedOrder {
        total: cart.total_price(),
        item_count: cart.item_count(),
    };
    let text = notification_text(cart, order, locale, placed_at);

    if let Err(e) = notifier.notify(&text).await {
        tracing::warn!(error = %e, "Order submission failed, cart kept");
        return Err(e.into());
    }

    cart.clear();
    tracing::info!(total = %placed.total, items = placed.item_count, "Order placed");
    Ok(placed)
}
