//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::CatalogStore;
use crate::services::{InFlightOrders, OrderNotifier};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the order notifier, in-flight order tracking and
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    notifier: Arc<dyn OrderNotifier>,
    orders_in_flight: InFlightOrders,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog store
    /// * `notifier` - Destination for placed orders
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: CatalogStore,
        notifier: Arc<dyn OrderNotifier>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                notifier,
                orders_in_flight: InFlightOrders::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the order notifier.
    #[must_use]
    pub fn notifier(&self) -> &dyn OrderNotifier {
        self.inner.notifier.as_ref()
    }

    /// Sessions currently submitting an order.
    #[must_use]
    pub fn orders_in_flight(&self) -> &InFlightOrders {
        &self.inner.orders_in_flight
    }
}
