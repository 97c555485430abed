//! Domain models for storefront.
//!
//! Catalog and cart types live in `dendy_food_core`; this module holds what
//! only the web layer needs.

pub mod session;
