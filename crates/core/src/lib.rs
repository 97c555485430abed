//! Dendy Food Core - catalog, cart and pricing.
//!
//! This crate holds the storefront's domain model:
//! - [`types`] - products, ids, discounts, locales and input validation
//! - [`cart`] - the session cart and category grouping
//! - [`order`] - checkout data and the order notification text
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! HTTP, no storage. The storefront binary and the CLI build on it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod order;
pub mod types;

pub use cart::{Cart, CartLine, CategoryGroup, group_by_category};
pub use order::{OrderData, PaymentMethod};
pub use types::*;
