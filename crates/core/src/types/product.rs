//! Catalog products and validation of untrusted product input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::locale::Locale;
use super::price::{self, Discount, deserialize_discount};

/// A sellable catalog entry, as stored in the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name_uz: String,
    pub name_ru: String,
    /// Base unit price in whole so'm.
    pub price: u64,
    pub category: String,
    #[serde(
        default,
        deserialize_with = "deserialize_discount",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount: Option<Discount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Build a product from validated fields and a store-assigned id.
    #[must_use]
    pub fn from_fields(id: ProductId, fields: ProductFields) -> Self {
        Self {
            id,
            name_uz: fields.name_uz,
            name_ru: fields.name_ru,
            price: fields.price,
            category: fields.category,
            discount: fields.discount,
            description: fields.description,
            image: fields.image,
        }
    }

    /// Replace every field except the id.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name_uz = fields.name_uz;
        self.name_ru = fields.name_ru;
        self.price = fields.price;
        self.category = fields.category;
        self.discount = fields.discount;
        self.description = fields.description;
        self.image = fields.image;
    }

    /// Display name in the given locale.
    #[must_use]
    pub fn name(&self, locale: Locale) -> &str {
        match locale {
            Locale::Uz => &self.name_uz,
            Locale::Ru => &self.name_ru,
        }
    }

    /// Per-unit price after discount. See [`price::effective_price`].
    #[must_use]
    pub fn effective_price(&self) -> rust_decimal::Decimal {
        price::effective_price(self)
    }
}

/// Validated product fields (everything except the id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name_uz: String,
    pub name_ru: String,
    pub price: u64,
    pub category: String,
    pub discount: Option<Discount>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Create/update request body.
///
/// Every field is optional on the wire so a missing field surfaces as a
/// [`ValidationError`] naming it, not as a decoding failure. Unknown keys
/// (including `id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name_uz: Option<String>,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A single rejected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Product input failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid product: {}", describe(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProductInput {
    /// Validate and normalize into [`ProductFields`].
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` listing every missing or invalid field.
    pub fn validate(self) -> Result<ProductFields, ValidationError> {
        let mut errors = Vec::new();

        let name_uz = required_text(self.name_uz, "nameUz", &mut errors);
        let name_ru = required_text(self.name_ru, "nameRu", &mut errors);
        let category = required_text(self.category, "category", &mut errors);
        let price = match self.price {
            None => {
                errors.push(FieldError {
                    field: "price",
                    message: "is required",
                });
                None
            }
            Some(p) => match whole_price(p) {
                Ok(p) => Some(p),
                Err(message) => {
                    errors.push(FieldError {
                        field: "price",
                        message,
                    });
                    None
                }
            },
        };

        match (name_uz, name_ru, category, price) {
            (Some(name_uz), Some(name_ru), Some(category), Some(price)) if errors.is_empty() => {
                Ok(ProductFields {
                    name_uz,
                    name_ru,
                    price,
                    category,
                    discount: self.discount.and_then(Discount::from_percent),
                    description: optional_text(self.description),
                    image: optional_text(self.image),
                })
            }
            _ => Err(ValidationError { errors }),
        }
    }
}

fn required_text(
    value: Option<String>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let text = optional_text(value);
    if text.is_none() {
        errors.push(FieldError {
            field,
            message: "is required",
        });
    }
    text
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Largest price representable exactly as an `f64` integer.
const MAX_PRICE: f64 = 9_007_199_254_740_991.0;

fn whole_price(value: f64) -> Result<u64, &'static str> {
    if !value.is_finite() {
        return Err("must be a number");
    }
    if value <= 0.0 {
        return Err("must be greater than 0");
    }
    if value.fract() != 0.0 {
        return Err("must be a whole amount");
    }
    if value > MAX_PRICE {
        return Err("is too large");
    }
    // Positive, integral and below 2^53: the cast is exact.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value as u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn burger_input() -> ProductInput {
        ProductInput {
            name_uz: Some("Burger".to_string()),
            name_ru: Some("Бургер".to_string()),
            price: Some(25_000.0),
            category: Some("Burger".to_string()),
            ..ProductInput::default()
        }
    }

    #[test]
    fn test_valid_input() {
        let fields = burger_input().validate().unwrap();
        assert_eq!(fields.name_uz, "Burger");
        assert_eq!(fields.price, 25_000);
        assert_eq!(fields.discount, None);
        assert_eq!(fields.image, None);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = ProductInput::default().validate().unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["nameUz", "nameRu", "category", "price"]);
    }

    #[test]
    fn test_blank_names_are_missing() {
        let input = ProductInput {
            name_ru: Some("   ".to_string()),
            ..burger_input()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(
            err.errors,
            vec![FieldError {
                field: "nameRu",
                message: "is required"
            }]
        );
    }

    #[test]
    fn test_price_must_be_positive_whole_amount() {
        for (price, message) in [
            (0.0, "must be greater than 0"),
            (-10.0, "must be greater than 0"),
            (10.5, "must be a whole amount"),
            (f64::INFINITY, "must be a number"),
        ] {
            let input = ProductInput {
                price: Some(price),
                ..burger_input()
            };
            let err = input.validate().unwrap_err();
            assert_eq!(err.errors.len(), 1);
            assert_eq!(err.errors.first().map(|e| e.message), Some(message));
        }
    }

    #[test]
    fn test_discount_is_normalized() {
        let input = ProductInput {
            discount: Some(140.0),
            ..burger_input()
        };
        assert_eq!(input.validate().unwrap().discount.map(Discount::percent), Some(100));

        let input = ProductInput {
            discount: Some(0.0),
            ..burger_input()
        };
        assert_eq!(input.validate().unwrap().discount, None);
    }

    #[test]
    fn test_blank_optional_text_is_dropped() {
        let input = ProductInput {
            image: Some(String::new()),
            description: Some("  Juicy  ".to_string()),
            ..burger_input()
        };
        let fields = input.validate().unwrap();
        assert_eq!(fields.image, None);
        assert_eq!(fields.description.as_deref(), Some("Juicy"));
    }

    #[test]
    fn test_input_ignores_client_supplied_id() {
        let input: ProductInput = serde_json::from_str(
            r#"{"id":"1712345678901","nameUz":"Cola","nameRu":"Кола","price":8000,"category":"Drink"}"#,
        )
        .unwrap();
        let product = Product::from_fields(ProductId::new("server-id"), input.validate().unwrap());
        assert_eq!(product.id.as_str(), "server-id");
    }

    #[test]
    fn test_apply_preserves_id() {
        let mut product = Product::from_fields(ProductId::new("abc"), burger_input().validate().unwrap());
        let update = ProductInput {
            price: Some(30_000.0),
            discount: Some(5.0),
            ..burger_input()
        };
        product.apply(update.validate().unwrap());
        assert_eq!(product.id.as_str(), "abc");
        assert_eq!(product.price, 30_000);
        assert_eq!(product.discount.map(Discount::percent), Some(5));
    }

    #[test]
    fn test_product_json_shape() {
        let product = Product::from_fields(ProductId::new("abc"), burger_input().validate().unwrap());
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "nameUz": "Burger",
                "nameRu": "Бургер",
                "price": 25000,
                "category": "Burger"
            })
        );
    }

    #[test]
    fn test_name_by_locale() {
        let product = Product::from_fields(ProductId::new("abc"), burger_input().validate().unwrap());
        assert_eq!(product.name(Locale::Uz), "Burger");
        assert_eq!(product.name(Locale::Ru), "Бургер");
    }
}
