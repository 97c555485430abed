//! Core types for the Dendy Food storefront.
//!
//! This module provides the catalog's value types and the pricing rules
//! that every other component derives prices from.

pub mod id;
pub mod locale;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use locale::{Locale, category_label};
pub use price::{Discount, effective_price, format_amount};
pub use product::{FieldError, Product, ProductFields, ProductInput, ValidationError};
