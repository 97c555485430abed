//! Discounts and effective-price arithmetic.
//!
//! Prices are whole so'm amounts (`u64`). Anything derived from a price goes
//! through [`Decimal`] so a discounted price is exact: 10% off 25 000 is
//! 22 500, 15% off 999 is 849.15, with no rounding until display.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::product::Product;

/// Largest accepted discount percentage.
pub const MAX_DISCOUNT_PERCENT: u8 = 100;

/// A non-zero discount percentage in `1..=100`.
///
/// Zero is represented by the absence of a discount, so `Option<Discount>`
/// has exactly one "no discount" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Discount(u8);

impl Discount {
    /// Create a discount, clamping to 100. Returns `None` for 0.
    #[must_use]
    pub const fn new(percent: u8) -> Option<Self> {
        match percent {
            0 => None,
            p if p > MAX_DISCOUNT_PERCENT => Some(Self(MAX_DISCOUNT_PERCENT)),
            p => Some(Self(p)),
        }
    }

    /// Normalize an untrusted percentage.
    ///
    /// Rounds to the nearest integer and clamps to `0..=100`. Non-finite
    /// values and anything that rounds to 0 yield `None`.
    #[must_use]
    pub fn from_percent(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let clamped = value.round().clamp(0.0, f64::from(MAX_DISCOUNT_PERCENT));
        // Clamped to 0..=100 above, so the cast is lossless.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = clamped as u8;
        Self::new(percent)
    }

    /// The percentage as an integer.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Multiplier applied to the base price: `1 - percent / 100`.
    #[must_use]
    pub fn factor(self) -> Decimal {
        Decimal::ONE - Decimal::from(self.0) / Decimal::ONE_HUNDRED
    }
}

/// Deserialize an optional discount from any JSON number.
///
/// Documents written by older tooling store `0` for "no discount" and may
/// carry fractional values; both are normalized through
/// [`Discount::from_percent`].
///
/// # Errors
///
/// Returns the deserializer's error if the value is neither null nor a number.
pub fn deserialize_discount<'de, D>(deserializer: D) -> Result<Option<Discount>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.and_then(Discount::from_percent))
}

/// Per-unit price after applying the product's discount.
///
/// `price * (1 - discount / 100)` when a discount is present, otherwise the
/// base price. Never rounded.
#[must_use]
pub fn effective_price(product: &Product) -> Decimal {
    let base = Decimal::from(product.price);
    product
        .discount
        .map_or(base, |discount| base * discount.factor())
}

/// Format an amount for human-readable messages.
///
/// Rounds to at most two fractional digits, drops trailing zeros and groups
/// thousands with spaces: `45000` → `"45 000"`, `849.150` → `"849.15"`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let text = amount.round_dp(2).normalize().to_string();
    let (sign, digits) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (integer, fraction) = digits
        .split_once('.')
        .map_or((digits, None), |(i, f)| (i, Some(f)));

    let mut out = String::with_capacity(text.len() + integer.len() / 3);
    out.push_str(sign);
    let len = integer.len();
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
