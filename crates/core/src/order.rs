//! Checkout data and the order notification text.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::{Locale, format_amount};

/// Currency suffix used in messages.
const CURRENCY: &str = "so'm";

/// How the customer pays on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl PaymentMethod {
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Cash, Locale::Uz) => "Naqd pul",
            (Self::Cash, Locale::Ru) => "Наличные",
            (Self::Card, Locale::Uz) => "Karta orqali",
            (Self::Card, Locale::Ru) => "Картой",
        }
    }
}

/// Delivery details collected for one checkout attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

impl OrderData {
    /// Build order data, trimming input and dropping a blank phone number.
    #[must_use]
    pub fn new(
        delivery_address: &str,
        payment_method: PaymentMethod,
        customer_phone: Option<&str>,
    ) -> Self {
        Self {
            delivery_address: delivery_address.trim().to_string(),
            payment_method,
            customer_phone: customer_phone
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from),
        }
    }
}

/// Staff-facing order summary sent to the notification sink.
///
/// Section labels are Uzbek; product and payment names follow `locale`.
/// Amounts use discounted unit prices.
#[derive(Debug, Clone, Copy)]
struct OrderSummary<'a> {
    cart: &'a Cart,
    order: &'a OrderData,
    locale: Locale,
    placed_at: NaiveDateTime,
}

impl fmt::Display for OrderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phone = self
            .order
            .customer_phone
            .as_deref()
            .unwrap_or("Ko'rsatilmagan");

        writeln!(f, "🍔 YANGI BUYURTMA!")?;
        writeln!(f, "📞 Telefon: {phone}")?;
        writeln!(
            f,
            "💰 To'lov usuli: {}",
            self.order.payment_method.label(self.locale)
        )?;
        writeln!(
            f,
            "📊 Jami summa: {} {CURRENCY}",
            format_amount(self.cart.total_price())
        )?;
        writeln!(f, "🛒 Buyurtma mahsulotlari:")?;
        for line in self.cart.lines() {
            writeln!(
                f,
                "{} — {} x {} {CURRENCY} = {} {CURRENCY}",
                line.product().name(self.locale),
                line.quantity(),
                format_amount(line.unit_price()),
                format_amount(line.line_total()),
            )?;
        }
        writeln!(f, "📍 Manzil: {}", self.order.delivery_address)?;
        write!(f, "⏰ Vaqt: {}", self.placed_at.format("%d.%m.%Y, %H:%M"))
    }
}

/// Render the staff-facing order summary for a cart.
#[must_use]
pub fn notification_text(
    cart: &Cart,
    order: &OrderData,
    locale: Locale,
    placed_at: NaiveDateTime,
) -> String {
    OrderSummary {
        cart,
        order,
        locale,
        placed_at,
    }
    .to_string()
}

/// Whether an order placed at `placed_at` is still inside its "placed"
/// display window at `now`.
#[must_use]
pub fn is_recently_placed(placed_at: DateTime<Utc>, now: DateTime<Utc>, window: TimeDelta) -> bool {
    let elapsed = now - placed_at;
    elapsed >= TimeDelta::zero() && elapsed < window
}
