//! Business logic services for storefront.
//!
//! # Services
//!
//! - `notifier` - Delivery of order summaries to the chat webhook
//! - `orders` - Order placement (empty-cart check, submission, cart reset)

pub mod notifier;
pub mod orders;

pub use notifier::{NotifyError, OrderNotifier, WebhookNotifier};
pub use orders::{InFlightOrders, OrderError, PlacedOrder, place_order};
